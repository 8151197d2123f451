//! Heuristic check for whether the reviewer is done asking for changes.
//!
//! Plain lower-cased substring matching. Concern phrases take precedence
//! over satisfaction phrases, and text matching neither keeps the loop
//! going. Negations such as "not good" are not understood.

/// Phrases signalling the reviewer still wants changes.
pub const CONCERN_PHRASES: &[&str] = &[
    "major issue",
    "significant problem",
    "needs improvement",
    "several issues",
    "should be fixed",
    "must be addressed",
    "critical problem",
];

/// Phrases signalling the reviewer accepts the code.
pub const SATISFACTION_PHRASES: &[&str] = &[
    "looks good",
    "well done",
    "excellent",
    "perfect",
    "solid implementation",
    "great job",
    "this is good",
    "good work",
    "nicely done",
    "well implemented",
];

/// Outcome of classifying one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least one concern phrase matched
    Concerns,
    /// No concern phrase, at least one satisfaction phrase
    Satisfied,
    /// Neither matched
    Undecided,
}

pub fn assess(review: &str) -> Verdict {
    let lowered = review.to_lowercase();

    if CONCERN_PHRASES.iter().any(|p| lowered.contains(p)) {
        Verdict::Concerns
    } else if SATISFACTION_PHRASES.iter().any(|p| lowered.contains(p)) {
        Verdict::Satisfied
    } else {
        Verdict::Undecided
    }
}

/// Whether the review should end the collaboration.
pub fn is_satisfied(review: &str) -> bool {
    assess(review) == Verdict::Satisfied
}
