//! Prompt templates for each step of the collaboration.

/// First writer prompt: the task alone.
pub fn initial_writer_prompt(task: &str) -> String {
    format!(
        "Please write code for this task: {task}\n\n\
        Requirements:\n\
        - Write clean, functional Python code\n\
        - Include proper error handling where appropriate\n\
        - Add brief comments explaining your approach\n\
        - Make sure the code is ready to run"
    )
}

/// Follow-up writer prompt carrying the last extracted code and the
/// reviewer's most recent feedback.
pub fn revision_writer_prompt(task: &str, previous_code: &str, feedback: &str) -> String {
    format!(
        "Please improve this code based on the reviewer's feedback:\n\n\
        Original task: {task}\n\n\
        Previous code:\n{previous_code}\n\n\
        Reviewer feedback:\n{feedback}\n\n\
        Please provide an improved version that addresses the reviewer's concerns."
    )
}

/// Reviewer prompt. Embeds the writer's full response, prose included.
pub fn review_prompt(task: &str, writer_response: &str) -> String {
    format!(
        "Please review this code for the task: '{task}'\n\n\
        Code to review:\n{writer_response}\n\n\
        Please provide:\n\
        1. What the code does well\n\
        2. Any issues or improvements needed\n\
        3. Specific suggestions for enhancement\n\
        4. If improvements are needed, provide updated code\n\n\
        Be thorough but constructive in your review."
    )
}
