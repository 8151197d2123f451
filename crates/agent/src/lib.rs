//! The writer/reviewer collaboration engine.
//!
//! Two personas share one completion provider:
//!
//! 1. The **Writer** drafts code for the task
//! 2. The **Reviewer** critiques the draft, possibly with an improved version
//! 3. The Writer revises using the extracted code and the critique
//!
//! The loop ends when the reviewer sounds satisfied (never on the first
//! round) or the iteration budget runs out. The final code is the newest
//! fenced block anywhere in the transcript.

pub mod convergence;
pub mod engine;
pub mod error;
pub mod extract;
pub mod persist;
pub mod prompts;
pub mod role;
pub mod role_agent;

#[cfg(test)]
mod test_helpers;

pub use convergence::{Verdict, assess, is_satisfied};
pub use engine::{CollaborationEngine, CollaborationResult, NO_FINAL_CODE, Turn, select_final_code};
pub use error::CollaborationError;
pub use extract::{NO_CODE_BLOCK, extract_code, first_code_block};
pub use persist::{PersistError, load_result, save_result};
pub use role::RoleIdentity;
pub use role_agent::RoleAgent;
