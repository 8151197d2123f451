//! # DevDuo Core
//!
//! Domain types, traits, and error definitions for the DevDuo pair-programming
//! engine. This crate has no HTTP or CLI dependencies — it defines the model
//! that the provider, agent and CLI crates implement against.
//!
//! ## Design Philosophy
//!
//! The completion backend is defined as a trait here and implemented in
//! `devduo-providers`. This enables:
//! - Swapping backends via configuration
//! - Driving the collaboration engine with scripted providers in tests
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::ProviderError;
pub use event::{DomainEvent, EventBus};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
