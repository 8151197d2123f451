//! End-to-end tests for the DevDuo collaboration pipeline.
//!
//! These drive the public API of `devduo-agent` with a scripted provider:
//! prompts go in, turns come out, and the result is persisted to disk.

use std::sync::Arc;
use std::time::Duration;

use devduo_agent::{
    CollaborationEngine, CollaborationError, NO_FINAL_CODE, RoleAgent, RoleIdentity, load_result,
    save_result,
};
use devduo_core::error::ProviderError;
use devduo_core::event::{DomainEvent, EventBus};
use devduo_core::message::Message;
use devduo_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted outcomes in sequence.
struct ScriptedProvider {
    outcomes: std::sync::Mutex<Vec<Result<String, ProviderError>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: std::sync::Mutex::new(outcomes),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// User prompt of the n-th call.
    fn prompt(&self, n: usize) -> String {
        self.prompts.lock().unwrap()[n].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let outcomes = self.outcomes.lock().unwrap();
        let call = prompts.len();
        if call >= outcomes.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                call,
                outcomes.len()
            );
        }
        let user_prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        prompts.push(user_prompt);

        outcomes[call].clone().map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: request.model,
        })
    }
}

fn engine(provider: Arc<ScriptedProvider>) -> CollaborationEngine {
    CollaborationEngine::new(provider, "gpt-3.5-turbo", 0.7, Arc::new(EventBus::default()))
        .with_pacing(Duration::ZERO)
}

fn python(body: &str) -> String {
    format!("Here's my solution:\n\n```python\n{body}\n```\n\nThis covers the edge cases.")
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_prime_task_runs_full_budget() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(python("def is_prime(n):\n    pass")),
        Ok("The logic needs improvement.".into()),
        Ok(python("def is_prime(n):\n    return n > 1")),
        Ok("Composite numbers pass; needs improvement.".into()),
        Ok(python("def is_prime(n):\n    if n < 2:\n        return False\n    return all(n % i for i in range(2, int(n ** 0.5) + 1))")),
        Ok("Edge cases still needs improvement.".into()),
    ]));

    let result = engine(provider.clone())
        .collaborate("write a function to check if a number is prime", 3, false)
        .await
        .unwrap();

    assert_eq!(result.iterations, 3);
    assert_eq!(result.transcript.len(), 6);
    assert_eq!(provider.calls(), 6);
    assert!(result.final_code.starts_with("def is_prime(n):\n    if n < 2:"));
    assert!(result.final_code.contains("int(n ** 0.5)"));
}

#[tokio::test]
async fn e2e_reviewer_satisfied_on_second_round() {
    let provider = Arc::new(ScriptedProvider::texts(&[
        &python("def rev(s): return s[::-1]"),
        "Should be fixed: no type check.",
        &python("def rev(s):\n    if not isinstance(s, str):\n        raise TypeError('expected str')\n    return s[::-1]"),
        "Great job, this is a solid implementation.",
    ]));

    let result = engine(provider.clone())
        .collaborate("reverse a string", 3, false)
        .await
        .unwrap();

    assert_eq!(result.iterations, 2);
    assert_eq!(result.transcript.len(), 4);
    assert_eq!(provider.calls(), 4);
    assert!(result.final_code.contains("raise TypeError"));
    assert_eq!(result.transcript.last().unwrap().role, RoleIdentity::Reviewer);
}

#[tokio::test]
async fn e2e_revision_prompt_carries_code_and_feedback() {
    let provider = Arc::new(ScriptedProvider::texts(&[
        &python("def fib(n): return n"),
        "Wrong for n > 1, needs improvement.",
        &python("def fib(n):\n    a, b = 0, 1\n    for _ in range(n):\n        a, b = b, a + b\n    return a"),
        "Nicely done.",
    ]));

    engine(provider.clone()).collaborate("fibonacci", 2, false).await.unwrap();

    let revision = provider.prompt(2);
    assert!(revision.contains("Previous code:\ndef fib(n): return n\n"));
    assert!(revision.contains("Reviewer feedback:\nWrong for n > 1, needs improvement."));
    assert!(provider.prompt(3).contains("a, b = b, a + b"));
}

#[tokio::test]
async fn e2e_no_code_anywhere() {
    let provider = Arc::new(ScriptedProvider::texts(&[
        "I'd need more detail.",
        "Please clarify, needs improvement.",
        "Still unclear.",
        "Needs improvement.",
    ]));

    let result = engine(provider).collaborate("???", 2, false).await.unwrap();

    assert_eq!(result.final_code, NO_FINAL_CODE);
    assert!(!result.has_code());
}

#[tokio::test]
async fn e2e_model_unavailable_is_critical() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(ProviderError::ModelUnavailable("gpt-4".into())),
        Ok("unreachable".into()),
    ]));

    let err = engine(provider.clone())
        .collaborate("anything", 3, false)
        .await
        .unwrap_err();

    match err {
        CollaborationError::Critical { role, source, .. } => {
            assert_eq!(role, RoleIdentity::Writer);
            assert!(matches!(source, ProviderError::ModelUnavailable(_)));
        }
        other => panic!("expected critical failure, got {other:?}"),
    }
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn e2e_rate_limit_on_reviewer_is_critical() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(python("x = 1")),
        Err(ProviderError::RateLimited { retry_after_secs: 5 }),
    ]));

    let err = engine(provider.clone())
        .collaborate("anything", 3, false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CollaborationError::Critical { role: RoleIdentity::Reviewer, .. }
    ));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn e2e_soft_failure_keeps_going() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(ProviderError::Timeout("read timed out".into())),
        Ok("There's nothing to review, needs improvement.".into()),
        Ok(python("x = 1")),
        Ok("Looks good.".into()),
    ]));

    let result = engine(provider.clone())
        .collaborate("anything", 3, false)
        .await
        .unwrap();

    assert_eq!(
        result.transcript[0].content,
        RoleAgent::failure_text(RoleIdentity::Writer)
    );
    assert!(provider.prompt(1).contains("Could not get response from Writer Agent"));
    assert_eq!(result.iterations, 2);
    assert_eq!(result.final_code, "x = 1");
}

#[tokio::test]
async fn e2e_zero_iterations_rejected() {
    let provider = Arc::new(ScriptedProvider::texts(&[]));
    let err = engine(provider.clone()).collaborate("task", 0, false).await.unwrap_err();
    assert!(matches!(err, CollaborationError::InvalidIterations));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn e2e_event_stream_for_verbose_run() {
    let bus = Arc::new(EventBus::new(64));
    let mut rx = bus.subscribe();
    let provider = Arc::new(ScriptedProvider::texts(&[
        &python("x = 1"),
        "needs improvement",
        &python("x = 2"),
        "Perfect.",
    ]));
    let engine = CollaborationEngine::new(provider, "gpt-3.5-turbo", 0.7, bus)
        .with_pacing(Duration::ZERO);

    engine.collaborate("set x", 3, true).await.unwrap();

    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        names.push(match event.as_ref() {
            DomainEvent::CollaborationStarted { .. } => "started",
            DomainEvent::TurnCompleted { .. } => "turn",
            DomainEvent::ReviewerSatisfied { .. } => "satisfied",
            DomainEvent::CollaborationFinished { .. } => "finished",
            DomainEvent::ErrorOccurred { .. } => "error",
        });
    }
    assert_eq!(
        names,
        vec!["started", "turn", "turn", "turn", "turn", "satisfied", "finished"]
    );
}

#[tokio::test]
async fn e2e_result_saved_and_reloaded() {
    let provider = Arc::new(ScriptedProvider::texts(&[
        &python("def search(xs, x): ..."),
        "Excellent.",
    ]));
    let result = engine(provider).collaborate("binary search", 1, false).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = save_result(&result, dir.path().join("devduo_result.json")).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["iterations"], 1);
    assert_eq!(raw["conversation_history"][0]["agent"], "Writer Agent");
    assert_eq!(raw["conversation_history"][1]["iteration"], 1);

    let loaded = load_result(&path).unwrap();
    assert_eq!(loaded.final_code, "def search(xs, x): ...");
    assert_eq!(loaded.transcript.len(), 2);
}
