//! A role persona bound to a completion provider.

use std::sync::Arc;
use devduo_core::provider::{Provider, ProviderRequest};
use tracing::{debug, error, warn};

use crate::error::CollaborationError;
use crate::role::RoleIdentity;

/// Sends prompts to the provider under one role's preamble.
///
/// Soft provider failures come back as a sentinel string so the
/// collaboration can keep going; critical ones are returned as
/// [`CollaborationError::Critical`].
pub struct RoleAgent {
    role: RoleIdentity,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl RoleAgent {
    pub fn new(role: RoleIdentity, provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            role,
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1500,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn role(&self) -> RoleIdentity {
        self.role
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Text substituted for a response when the provider fails softly.
    pub fn failure_text(role: RoleIdentity) -> String {
        format!(
            "Error: Could not get response from {}. Please check your API key and connection.",
            role.label()
        )
    }

    /// Ask the model for this role's response to `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<String, CollaborationError> {
        debug!(role = %self.role, model = %self.model, prompt_len = prompt.len(), "Requesting completion");

        let request = ProviderRequest::chat(
            &self.model,
            self.role.preamble(),
            prompt,
            self.temperature,
            self.max_tokens,
        );

        match self.provider.complete(request).await {
            Ok(response) => Ok(response.message.content),
            Err(e) if e.is_critical() => {
                error!(role = %self.role, model = %self.model, error = %e, "Critical provider failure");
                Err(CollaborationError::Critical {
                    role: self.role,
                    model: self.model.clone(),
                    source: e,
                })
            }
            Err(e) => {
                warn!(role = %self.role, error = %e, "Provider failed, continuing with degraded turn");
                Ok(Self::failure_text(self.role))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use devduo_core::error::ProviderError;
    use devduo_core::message::Role;

    #[tokio::test]
    async fn sends_preamble_and_prompt() {
        let provider = Arc::new(ScriptedProvider::texts(&["here is code"]));
        let agent = RoleAgent::new(RoleIdentity::Reviewer, provider.clone(), "gpt-4")
            .with_temperature(0.2)
            .with_max_tokens(800);

        let out = agent.generate("Review this").await.unwrap();
        assert_eq!(out, "here is code");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.model, "gpt-4");
        assert_eq!(req.max_tokens, Some(800));
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[0].content, RoleIdentity::Reviewer.preamble());
        assert_eq!(req.messages[1].content, "Review this");
    }

    #[tokio::test]
    async fn soft_failure_becomes_sentinel_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Network(
            "connection reset".into(),
        ))]));
        let agent = RoleAgent::new(RoleIdentity::Writer, provider, "gpt-3.5-turbo");

        let out = agent.generate("Write code").await.unwrap();
        assert_eq!(out, RoleAgent::failure_text(RoleIdentity::Writer));
        assert!(out.contains("Writer Agent"));
    }

    #[tokio::test]
    async fn critical_failure_is_returned() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(
            ProviderError::ModelUnavailable("gpt-4".into()),
        )]));
        let agent = RoleAgent::new(RoleIdentity::Writer, provider, "gpt-4");

        let err = agent.generate("Write code").await.unwrap_err();
        match err {
            CollaborationError::Critical { role, model, source } => {
                assert_eq!(role, RoleIdentity::Writer);
                assert_eq!(model, "gpt-4");
                assert!(matches!(source, ProviderError::ModelUnavailable(_)));
            }
            other => panic!("expected critical failure, got {other:?}"),
        }
    }
}
