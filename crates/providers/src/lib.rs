//! LLM provider implementations for DevDuo.
//!
//! All providers implement the `devduo_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod models;
pub mod openai_compat;
pub mod router;

pub use models::{available_chat_models, filter_chat_models, recommend, FALLBACK_MODEL};
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
