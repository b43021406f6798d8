//! Agent Event Bus
//!
//! In-process broadcast of agent lifecycle and validation events using a
//! tokio broadcast channel. Publishing never blocks and never fails: without
//! subscribers the event is dropped, and slow subscribers lose the oldest
//! events once the channel is full.

use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::service::ValidationResult;
use tokio::sync::broadcast;
use tracing::debug;

/// Events emitted by the validation service
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// The service was activated
    Started,
    /// The service was deactivated
    Stopped,
    /// One file finished validating
    ValidationComplete(ValidationResult),
}

/// Broadcast channel for [`AgentEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AgentEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Create with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: AgentEvent) {
        match self.sender.send(event) {
            Ok(count) => debug!("Published agent event to {} subscribers", count),
            Err(_) => debug!("Published agent event but no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.sender.subscribe()
    }

    /// Get the current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
