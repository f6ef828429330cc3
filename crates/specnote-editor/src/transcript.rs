//! Chat transcript: ordered, append-only log of conversation turns.
//!
//! The only in-place mutation is growing (or failing) the model message that
//! is currently streaming. Lookups by id never panic: chunk delivery can race
//! with `clear`, so operations on vanished ids are silent no-ops.

use serde::{Deserialize, Serialize};
use specnote_common::MessageId;
use tracing::trace;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Model,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub is_error: bool,
    #[serde(skip)]
    streaming: bool,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>, streaming: bool) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            is_error: false,
            streaming,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, false)
    }

    /// A finished model reply.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Sender::Model, text, false)
    }

    /// An empty model message that accepts streamed chunks.
    pub fn model_placeholder() -> Self {
        Self::new(Sender::Model, String::new(), true)
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Whether this message can be spliced into the document.
    pub fn is_insertable(&self) -> bool {
        self.sender == Sender::Model && !self.is_error && !self.text.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the end and return its id.
    pub fn append(&mut self, message: Message) -> MessageId {
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Concatenate `chunk` onto a streaming message.
    ///
    /// Returns whether the chunk was applied.
    pub fn append_chunk(&mut self, id: &MessageId, chunk: &str) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.text.push_str(chunk);
                true
            }
            None => {
                trace!(message_id = %id, "dropping chunk for inactive message");
                false
            }
        }
    }

    /// Stop accepting chunks for `id`; its text is final.
    pub fn finish(&mut self, id: &MessageId) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.streaming = false;
                true
            }
            None => false,
        }
    }

    /// Replace a streaming message's text and finish it.
    pub fn complete_with(&mut self, id: &MessageId, text: impl Into<String>) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.text = text.into();
                message.streaming = false;
                true
            }
            None => false,
        }
    }

    /// Flag a message as failed, replacing its text with the error description.
    pub fn mark_error(&mut self, id: &MessageId, error_text: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(message) => {
                message.is_error = true;
                message.text = error_text.into();
                message.streaming = false;
                true
            }
            None => false,
        }
    }

    fn streaming_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages
            .iter_mut()
            .find(|m| &m.id == id)
            .filter(|m| m.streaming)
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Insertable model replies, most recent first.
    pub fn replies(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().rev().filter(|m| m.is_insertable())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
