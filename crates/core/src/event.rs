//! Domain event system — lets a front end follow a collaboration live.
//!
//! The collaboration engine publishes events as turns are produced. Any
//! number of subscribers can listen; publishing with none is a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A collaboration began
    CollaborationStarted {
        task: String,
        max_iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// A role produced a turn (only published for verbose runs)
    TurnCompleted {
        role: String,
        iteration: u32,
        content: String,
        timestamp: DateTime<Utc>,
    },

    /// The reviewer signalled it is satisfied and the loop stopped early
    ReviewerSatisfied {
        iteration: u32,
        timestamp: DateTime<Utc>,
    },

    /// The collaboration produced its result
    CollaborationFinished {
        iterations: u32,
        code_found: bool,
        timestamp: DateTime<Utc>,
    },

    /// An error occurred
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
