use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::MessageId;
use crate::types::{ContextScope, SessionState};

/// State changes published by the session controller for view layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    MessageAppended(MessageId),
    ChunkAppended { id: MessageId, chunk: String },
    MessageFinished(MessageId),
    MessageFailed { id: MessageId, error: String },
    StateChanged(SessionState),
    ScopeChanged(ContextScope),
    DocumentEdited { cursor: usize },
    TranscriptCleared,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: SessionEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::TranscriptCleared);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::TranscriptCleared));
    }

    #[tokio::test]
    async fn chunk_events_arrive_in_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let id = MessageId::new();

        for chunk in ["Hel", "lo, ", "world"] {
            bus.publish(SessionEvent::ChunkAppended {
                id: id.clone(),
                chunk: chunk.into(),
            });
        }

        let mut text = String::new();
        for _ in 0..3 {
            if let SessionEvent::ChunkAppended { chunk, .. } = rx.recv().await.unwrap() {
                text.push_str(&chunk);
            }
        }
        assert_eq!(text, "Hello, world");
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(SessionEvent::StateChanged(SessionState::Streaming));

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, SessionEvent::StateChanged(SessionState::Streaming)));
        assert!(matches!(e2, SessionEvent::StateChanged(SessionState::Streaming)));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(SessionEvent::ScopeChanged(ContextScope::None));
        assert_eq!(count, 0);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomethingNew","data":null}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, SessionEvent::Unknown));
    }
}
