//! Errors that escape the collaboration engine.
//!
//! Soft provider failures never show up here: they become sentinel text
//! inside the transcript.

use devduo_core::error::ProviderError;
use thiserror::Error;

use crate::role::RoleIdentity;

#[derive(Debug, Error)]
pub enum CollaborationError {
    /// The provider failed in a way that makes every further call pointless.
    /// The binary is expected to report it and exit non-zero.
    #[error("critical failure from {role} (model {model}): {source}")]
    Critical {
        role: RoleIdentity,
        model: String,
        #[source]
        source: ProviderError,
    },

    #[error("max_iterations must be at least 1")]
    InvalidIterations,
}

impl CollaborationError {
    /// The provider error behind a critical failure.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Critical { source, .. } => Some(source),
            Self::InvalidIterations => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_display_names_role_and_model() {
        let err = CollaborationError::Critical {
            role: RoleIdentity::Reviewer,
            model: "gpt-4".into(),
            source: ProviderError::QuotaExceeded("out of credits".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Reviewer Agent"));
        assert!(msg.contains("gpt-4"));
        assert!(matches!(err.provider_error(), Some(ProviderError::QuotaExceeded(_))));
    }
}
