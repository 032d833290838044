//! Conversation session
//!
//! Owns the transcript, the pending attachments and the single-flight request
//! lifecycle. The session is synchronous: accepting a submission returns the
//! [`Request`] to execute, and the outcome is handed back through
//! [`Session::resolve`].

mod effect;
mod event;
mod message;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Request, Route};
pub use event::Event;
pub use message::{Message, MessageKind, Sender, Transcript};
pub use state::{AttachmentPreview, Composer, SessionSnapshot, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};

use crate::transport::{Answer, Attachment, RequestError, RequestErrorKind};
use uuid::Uuid;

/// Conversation session, constructed with its bearer token
pub struct Session {
    id: Uuid,
    token: String,
    state: SessionState,
    transcript: Transcript,
    pending: Vec<Attachment>,
    composer: Composer,
    /// Kind of the most recent failed request, cleared by the next success
    last_failure: Option<RequestErrorKind>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: token.into(),
            state: SessionState::Idle,
            transcript: Transcript::new(),
            pending: Vec::new(),
            composer: Composer::default(),
            last_failure: None,
        }
    }

    /// Open the transcript with a bot greeting
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.transcript
            .push(Sender::Bot, MessageKind::Normal, greeting.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn pending(&self) -> &[Attachment] {
        &self.pending
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn last_failure(&self) -> Option<RequestErrorKind> {
        self.last_failure
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let in_flight = match &self.state {
            SessionState::Sending { sent } => sent.clone(),
            SessionState::Idle => Vec::new(),
        };
        SessionSnapshot {
            messages: self.transcript.messages().to_vec(),
            pending: self.pending.iter().map(AttachmentPreview::from).collect(),
            in_flight,
            busy: self.is_busy(),
            composer: self.composer.clone(),
            last_failure: self.last_failure,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.composer.draft = text.into();
    }

    /// Stage files for the next submission. Valid in any state.
    pub fn attach(&mut self, files: impl IntoIterator<Item = Attachment>) {
        let before = self.pending.len();
        self.pending.extend(files);

        if let Some(first) = self.pending.get(before) {
            self.composer.notice = Some(format!("Document \"{}\" attached.", first.name));
            tracing::debug!(
                session = %self.id,
                added = self.pending.len() - before,
                pending = self.pending.len(),
                "Attachments staged"
            );
        }
    }

    /// Remove the attachment at `index`; out of range is a no-op
    pub fn detach(&mut self, index: usize) -> Option<Attachment> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            tracing::debug!(session = %self.id, index, "Detach index out of range, ignoring");
            None
        }
    }

    /// Try to start a submission.
    ///
    /// Returns the request to execute, or `None` when the submission is
    /// refused (nothing to send, or a request is already in flight).
    pub fn submit(&mut self, text: &str) -> Option<Request> {
        let event = Event::Submit {
            text: text.to_string(),
            attachments: self.pending.iter().map(|a| a.name.clone()).collect(),
        };

        match transition(&self.state, event) {
            Ok(result) => self.apply(result),
            Err(e) => {
                tracing::debug!(session = %self.id, reason = %e, "Submission ignored");
                None
            }
        }
    }

    /// Apply the outcome of the outstanding request
    pub fn resolve(&mut self, outcome: Result<Answer, RequestError>) {
        if let Err(e) = &outcome {
            tracing::warn!(session = %self.id, kind = ?e.kind, error = %e, "Request failed");
        }

        let failure = outcome.as_ref().err().map(|e| e.kind);
        match transition(&self.state, Event::Resolved { outcome }) {
            Ok(result) => {
                self.last_failure = failure;
                self.apply(result);
            }
            Err(e) => {
                tracing::warn!(session = %self.id, reason = %e, "Outcome ignored");
            }
        }
    }

    fn apply(&mut self, result: TransitionResult) -> Option<Request> {
        let old = std::mem::replace(&mut self.state, result.new_state);
        tracing::debug!(
            session = %self.id,
            from = old.name(),
            to = self.state.name(),
            "Session transition"
        );

        let mut request = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { sender, kind, text } => {
                    self.transcript.push(sender, kind, text);
                }
                Effect::ClearComposer => self.composer.clear(),
                Effect::Dispatch(Route::Query { text }) => {
                    request = Some(Request::Query { text });
                }
                Effect::Dispatch(Route::Attachments { text }) => {
                    // The whole batch leaves now; files attached during flight stay pending
                    let files = std::mem::take(&mut self.pending);
                    request = Some(Request::Attachments { files, text });
                }
            }
        }
        request
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("messages", &self.transcript.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
