//! Session state types

use super::message::Message;
use crate::transport::{Attachment, RequestErrorKind};
use serde::Serialize;

/// Request lifecycle of a session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Ready to accept a submission
    #[default]
    Idle,
    /// Exactly one transport call is outstanding
    Sending {
        /// Names of the attachments moved into the request, in send order
        sent: Vec<String>,
    },
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Sending { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Sending { .. } => "sending",
        }
    }
}

/// Input-area state: the draft and the attachment flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Composer {
    pub draft: String,
    /// Shown after files are picked, e.g. `Document "a.pdf" attached.`
    pub notice: Option<String>,
}

impl Composer {
    pub fn clear(&mut self) {
        self.draft.clear();
        self.notice = None;
    }
}

/// Pending attachment as shown in the preview strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentPreview {
    pub name: String,
    pub size: usize,
}

impl From<&Attachment> for AttachmentPreview {
    fn from(a: &Attachment) -> Self {
        Self {
            name: a.name.clone(),
            size: a.size(),
        }
    }
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub pending: Vec<AttachmentPreview>,
    /// Attachments of the outstanding request, empty when idle
    pub in_flight: Vec<String>,
    pub busy: bool,
    pub composer: Composer,
    /// Kind of the latest failed request, if the latest outcome was a failure
    pub last_failure: Option<RequestErrorKind>,
}

impl SessionSnapshot {
    /// Messages appended after the first `seen` ones
    pub fn messages_since(&self, seen: usize) -> &[Message] {
        self.messages.get(seen..).unwrap_or_default()
    }
}
