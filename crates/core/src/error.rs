//! Provider error taxonomy.
//!
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Failures reported by a completion backend.
///
/// `ModelUnavailable`, `QuotaExceeded` and `RateLimited` are *critical*: every
/// further call with the same key and model is certain to fail the same way.
/// All other variants are soft and only degrade the current turn.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Whether this failure must halt the whole run.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable(_) | Self::QuotaExceeded(_) | Self::RateLimited { .. }
        )
    }
}
