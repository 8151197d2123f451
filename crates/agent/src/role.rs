//! The two fixed personas of a collaboration.

use serde::{Deserialize, Serialize};

const WRITER_PREAMBLE: &str = "You are a skilled software developer focused on writing clean, functional code.
Your role is to:
- Write initial implementations for coding tasks
- Improve existing code based on reviewer feedback
- Focus on functionality and clarity
- Include code in ```python code blocks
- Provide brief explanations of your approach

Always structure your response with code blocks and explanations.";

const REVIEWER_PREAMBLE: &str = "You are an experienced code reviewer focused on improvement and best practices.
Your role is to:
- Review code for correctness, efficiency, and best practices
- Identify potential bugs or edge cases
- Suggest specific improvements
- Provide improved code when necessary
- Include improved code in ```python code blocks

Be constructive and specific in your feedback. If the code is already good, acknowledge it.";

/// Which persona a role agent embodies.
///
/// Serialized with its display label so saved transcripts read
/// `"agent": "Writer Agent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleIdentity {
    /// Drafts and revises code
    #[serde(rename = "Writer Agent")]
    Writer,
    /// Critiques the writer's output
    #[serde(rename = "Reviewer Agent")]
    Reviewer,
}

impl RoleIdentity {
    /// Label attached to turns and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Writer => "Writer Agent",
            Self::Reviewer => "Reviewer Agent",
        }
    }

    /// System preamble sent with every completion for this role.
    pub fn preamble(&self) -> &'static str {
        match self {
            Self::Writer => WRITER_PREAMBLE,
            Self::Reviewer => REVIEWER_PREAMBLE,
        }
    }
}

impl std::fmt::Display for RoleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
