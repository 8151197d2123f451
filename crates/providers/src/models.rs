//! Chat-model discovery helpers.
//!
//! `/models` endpoints return every model the key can see, including
//! embedding, audio and image models. Only chat-capable ids are offered
//! for selection.

use std::sync::Arc;
use devduo_core::error::ProviderError;
use devduo_core::provider::Provider;
use tracing::warn;

/// Model used when discovery yields nothing.
pub const FALLBACK_MODEL: &str = "gpt-3.5-turbo";

const CHAT_MODEL_KEYWORDS: &[&str] = &["gpt-3.5", "gpt-4", "turbo"];

/// Keep chat-capable model ids, sorted.
pub fn filter_chat_models(models: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut chat: Vec<String> = models
        .into_iter()
        .filter(|id| CHAT_MODEL_KEYWORDS.iter().any(|k| id.contains(k)))
        .collect();
    chat.sort();
    chat
}

/// List chat models available through `provider`.
pub async fn available_chat_models(
    provider: &Arc<dyn Provider>,
) -> Result<Vec<String>, ProviderError> {
    let models = provider.list_models().await?;
    Ok(filter_chat_models(models))
}

/// Like [`available_chat_models`] but degrades to an empty list.
pub async fn available_chat_models_or_empty(provider: &Arc<dyn Provider>) -> Vec<String> {
    match available_chat_models(provider).await {
        Ok(models) => models,
        Err(e) => {
            warn!("Could not fetch models: {e}");
            Vec::new()
        }
    }
}

/// Recommendations printed by `devduo models`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ModelRecommendations {
    /// First gpt-4 family model, the most capable option
    pub most_capable: Option<String>,
    /// Present when gpt-3.5-turbo is available
    pub cost_effective: Option<String>,
}

pub fn recommend(chat_models: &[String]) -> ModelRecommendations {
    ModelRecommendations {
        most_capable: chat_models.iter().find(|m| m.contains("gpt-4")).cloned(),
        cost_effective: chat_models
            .iter()
            .any(|m| m.contains("gpt-3.5-turbo"))
            .then(|| FALLBACK_MODEL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use devduo_core::provider::{ProviderRequest, ProviderResponse};

    struct ListingProvider(Result<Vec<String>, ProviderError>);

    #[async_trait]
    impl Provider for ListingProvider {
        fn name(&self) -> &str {
            "listing"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("listing only".into()))
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            self.0.clone()
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filters_and_sorts_chat_models() {
        let models = filter_chat_models(ids(&[
            "whisper-1",
            "gpt-4o",
            "text-embedding-3-small",
            "gpt-3.5-turbo",
            "dall-e-3",
            "gpt-4",
        ]));
        assert_eq!(models, ids(&["gpt-3.5-turbo", "gpt-4", "gpt-4o"]));
    }

    #[test]
    fn recommendations() {
        let recs = recommend(&ids(&["gpt-3.5-turbo", "gpt-4", "gpt-4-turbo"]));
        assert_eq!(recs.most_capable.as_deref(), Some("gpt-4"));
        assert_eq!(recs.cost_effective.as_deref(), Some("gpt-3.5-turbo"));

        assert_eq!(recommend(&[]), ModelRecommendations::default());
    }

    #[tokio::test]
    async fn listing_failure_degrades_to_empty() {
        let provider: Arc<dyn Provider> =
            Arc::new(ListingProvider(Err(ProviderError::Network("offline".into()))));
        assert!(available_chat_models_or_empty(&provider).await.is_empty());
    }

    #[tokio::test]
    async fn listing_is_filtered() {
        let provider: Arc<dyn Provider> =
            Arc::new(ListingProvider(Ok(ids(&["tts-1", "gpt-4", "babbage-002"]))));
        assert_eq!(available_chat_models(&provider).await.unwrap(), ids(&["gpt-4"]));
    }
}
