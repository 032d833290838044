//! Effects produced by state transitions

use super::message::{MessageKind, Sender};
use crate::transport::Attachment;

/// Which endpoint an accepted submission goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Query { text: String },
    Attachments { text: Option<String> },
}

/// Effects to be applied by the session after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage {
        sender: Sender,
        kind: MessageKind,
        text: String,
    },

    /// Clear the draft and the attachment notice
    ClearComposer,

    /// Move the pending attachments out and start the transport call
    Dispatch(Route),
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            kind: MessageKind::Normal,
            text: text.into(),
        }
    }

    pub fn document_notice(names: &[String]) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            kind: MessageKind::DocumentNotice,
            text: format!("You sent document(s): {}", names.join(", ")),
        }
    }

    pub fn bot_answer(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            kind: MessageKind::Normal,
            text: text.into(),
        }
    }

    pub fn bot_error(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// A transport call to execute, carrying everything it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Query {
        text: String,
    },
    Attachments {
        files: Vec<Attachment>,
        text: Option<String>,
    },
}

impl Request {
    pub fn route_name(&self) -> &'static str {
        match self {
            Request::Query { .. } => "query",
            Request::Attachments { .. } => "attachments",
        }
    }
}
