//! Transcript entries

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// How a message should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Normal,
    DocumentNotice,
    Error,
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub kind: MessageKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

/// Append-only message log that owns id assignment
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id and append
    pub fn push(&mut self, sender: Sender, kind: MessageKind, text: impl Into<String>) -> &Message {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            sender,
            kind,
            text: text.into(),
            created_at: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_in_append_order() {
        let mut transcript = Transcript::new();
        transcript.push(Sender::User, MessageKind::Normal, "hi");
        transcript.push(Sender::Bot, MessageKind::Normal, "hello");
        transcript.push(Sender::Bot, MessageKind::Error, "oops");

        let ids: Vec<u64> = transcript.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(transcript.last().unwrap().is_error());
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_value(MessageKind::DocumentNotice).unwrap();
        assert_eq!(json, "document-notice");
        let json = serde_json::to_value(Sender::Bot).unwrap();
        assert_eq!(json, "bot");
    }
}
