//! Append-only message log

use super::entities::Message;
use serde::{Deserialize, Serialize};

/// Ordered record of every message exchanged in a run.
///
/// There is no way to remove or edit an entry, so any slice handed out is a
/// consistent prefix of the final history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return a reference to the stored entry
    pub fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The first `len` messages (clamped to the log length)
    pub fn prefix(&self, len: usize) -> &[Message] {
        &self.messages[..len.min(self.messages.len())]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
