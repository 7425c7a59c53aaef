//! Fan-out of change notifications to connected clients.

use tokio::sync::broadcast;
use tracing::debug;

/// Default number of events a slow subscriber may fall behind before lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Signal sent to every client after contact data changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    /// Contact data changed; re-fetch the list.
    Update,
}

impl ContactEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Update => "Update",
        }
    }
}

impl std::fmt::Display for ContactEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Publishes contact events to whoever is listening.
pub trait Notifier: Send + Sync {
    fn publish(&self, event: ContactEvent);
}

/// In-process broadcast hub backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<ContactEvent>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContactEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl Notifier for BroadcastHub {
    fn publish(&self, event: ContactEvent) {
        match self.sender.send(event) {
            Ok(subscribers) => debug!(event = %event, subscribers, "Broadcast contact event"),
            // Nobody connected is not a failure
            Err(_) => debug!(event = %event, "No subscribers for contact event"),
        }
    }
}
