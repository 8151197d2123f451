//! The writer/reviewer collaboration loop.
//!
//! Each iteration is one writer turn followed by one reviewer turn:
//!
//! ```text
//!   task ──▶ Writer ──▶ extract code ──▶ Reviewer ──▶ satisfied? ──▶ stop
//!              ▲                             │            (never on
//!              └──── code + feedback ◀───────┘          iteration 1)
//! ```
//!
//! Turns are appended to a transcript in order. When the loop ends, the
//! newest turn holding a fenced code block supplies the final code.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use devduo_core::event::{DomainEvent, EventBus};
use devduo_core::provider::Provider;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::convergence;
use crate::error::CollaborationError;
use crate::extract::{NO_CODE_BLOCK, extract_code};
use crate::prompts;
use crate::role::RoleIdentity;
use crate::role_agent::RoleAgent;

/// Final code when no turn in the transcript holds a fenced block.
pub const NO_FINAL_CODE: &str = "# No final code found";

/// One recorded response from one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "agent")]
    pub role: RoleIdentity,
    pub content: String,
    /// 1-based; shared by a writer turn and the reviewer turn after it
    pub iteration: u32,
}

/// Snapshot of a finished collaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationResult {
    pub task: String,
    pub final_code: String,
    #[serde(rename = "conversation_history")]
    pub transcript: Vec<Turn>,
    /// Completed writer/reviewer pairs
    pub iterations: u32,
}

impl CollaborationResult {
    /// Whether any turn produced usable code.
    pub fn has_code(&self) -> bool {
        self.final_code != NO_FINAL_CODE
    }
}

/// Mutable state of one run. Lives only inside [`CollaborationEngine::collaborate`].
struct Session {
    task: String,
    transcript: Vec<Turn>,
    current_code: String,
    finished: bool,
}

impl Session {
    fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            transcript: Vec::new(),
            current_code: String::new(),
            finished: false,
        }
    }

    fn last_content(&self) -> &str {
        self.transcript.last().map(|t| t.content.as_str()).unwrap_or_default()
    }

    fn into_result(self) -> CollaborationResult {
        let final_code = select_final_code(&self.transcript);
        let iterations = (self.transcript.len() / 2) as u32;
        CollaborationResult {
            task: self.task,
            final_code,
            transcript: self.transcript,
            iterations,
        }
    }
}

/// Newest extracted code in the transcript, scanning backward.
///
/// A block whose body is exactly the extraction sentinel is skipped, so a
/// reviewer quoting `Previous code:` after a writer miss never wins.
pub fn select_final_code(transcript: &[Turn]) -> String {
    transcript
        .iter()
        .rev()
        .map(|turn| extract_code(&turn.content))
        .find(|code| code != NO_CODE_BLOCK)
        .unwrap_or_else(|| NO_FINAL_CODE.to_string())
}

/// Drives alternating writer and reviewer turns until the reviewer is
/// satisfied or the iteration budget runs out.
pub struct CollaborationEngine {
    writer: RoleAgent,
    reviewer: RoleAgent,
    /// Pause after every completion call
    pacing: Duration,
    event_bus: Arc<EventBus>,
}

impl CollaborationEngine {
    /// Create an engine where both roles share one provider and model.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let model = model.into();
        Self {
            writer: RoleAgent::new(RoleIdentity::Writer, provider.clone(), &model)
                .with_temperature(temperature),
            reviewer: RoleAgent::new(RoleIdentity::Reviewer, provider, &model)
                .with_temperature(temperature),
            pacing: Duration::from_secs(1),
            event_bus,
        }
    }

    /// Build an engine from application config.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        config: &devduo_config::AppConfig,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self::new(provider, model, config.temperature, event_bus)
            .with_max_tokens(config.max_tokens)
            .with_pacing(Duration::from_millis(config.collaboration.pacing_ms))
    }

    /// Set the max tokens for both roles.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.writer = self.writer.with_max_tokens(max_tokens);
        self.reviewer = self.reviewer.with_max_tokens(max_tokens);
        self
    }

    /// Set the pause inserted after every completion call.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run a collaboration on `task` for at most `max_iterations` pairs.
    ///
    /// With `verbose`, every turn is published on the event bus as it is
    /// recorded. A critical provider failure aborts immediately; soft
    /// failures appear as sentinel text in the transcript.
    pub async fn collaborate(
        &self,
        task: &str,
        max_iterations: u32,
        verbose: bool,
    ) -> Result<CollaborationResult, CollaborationError> {
        if max_iterations == 0 {
            return Err(CollaborationError::InvalidIterations);
        }

        info!(max_iterations, model = %self.writer.model(), "Starting collaboration");
        self.event_bus.publish(DomainEvent::CollaborationStarted {
            task: task.to_string(),
            max_iterations,
            timestamp: Utc::now(),
        });

        let mut session = Session::new(task);

        for iteration in 1..=max_iterations {
            info!(iteration, max_iterations, "Iteration started");

            // ── Writer ──
            let writer_prompt = if iteration == 1 {
                prompts::initial_writer_prompt(task)
            } else {
                prompts::revision_writer_prompt(task, &session.current_code, session.last_content())
            };
            let draft = self.take_turn(&self.writer, &writer_prompt).await?;
            session.current_code = extract_code(&draft);
            self.record(&mut session, RoleIdentity::Writer, iteration, draft, verbose);

            // ── Reviewer ──
            let review_prompt = prompts::review_prompt(task, session.last_content());
            let review = self.take_turn(&self.reviewer, &review_prompt).await?;
            let verdict = convergence::assess(&review);
            self.record(&mut session, RoleIdentity::Reviewer, iteration, review, verbose);

            debug!(iteration, ?verdict, "Review classified");

            // The first round always gets at least one revision.
            if iteration > 1 && verdict == convergence::Verdict::Satisfied {
                info!(iteration, "Reviewer is satisfied, stopping early");
                self.event_bus.publish(DomainEvent::ReviewerSatisfied {
                    iteration,
                    timestamp: Utc::now(),
                });
                session.finished = true;
                break;
            }
        }

        if !session.finished {
            debug!("Iteration budget exhausted");
        }

        let result = session.into_result();
        info!(
            iterations = result.iterations,
            code_found = result.has_code(),
            "Collaboration complete"
        );
        self.event_bus.publish(DomainEvent::CollaborationFinished {
            iterations: result.iterations,
            code_found: result.has_code(),
            timestamp: Utc::now(),
        });

        Ok(result)
    }

    /// One completion call followed by the pacing pause.
    async fn take_turn(&self, agent: &RoleAgent, prompt: &str) -> Result<String, CollaborationError> {
        let text = match agent.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: agent.role().label().to_string(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(e);
            }
        };

        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
        Ok(text)
    }

    fn record(
        &self,
        session: &mut Session,
        role: RoleIdentity,
        iteration: u32,
        content: String,
        verbose: bool,
    ) {
        debug!(%role, iteration, len = content.len(), "Turn recorded");
        if verbose {
            self.event_bus.publish(DomainEvent::TurnCompleted {
                role: role.label().to_string(),
                iteration,
                content: content.clone(),
                timestamp: Utc::now(),
            });
        }
        session.transcript.push(Turn {
            role,
            content,
            iteration,
        });
    }
}
