//! Pure state transition function
//!
//! Given the same state and event, `transition` always produces the same new
//! state and effects. It performs no I/O and assigns no ids; the session
//! applies the effects.

use super::effect::{Effect, Route};
use super::event::Event;
use super::state::SessionState;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Reasons a transition is refused. None of these reach the transcript.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is already in flight")]
    Busy,
    #[error("Nothing to send")]
    EmptySubmission,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Single flight: a second submit while sending is refused
        (SessionState::Sending { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        (SessionState::Idle, Event::Submit { text, attachments }) => {
            let has_text = !text.trim().is_empty();
            if !has_text && attachments.is_empty() {
                return Err(TransitionError::EmptySubmission);
            }

            let route = if attachments.is_empty() {
                Route::Query { text: text.clone() }
            } else {
                Route::Attachments {
                    text: has_text.then(|| text.clone()),
                }
            };

            let optimistic = has_text.then(|| Effect::user_message(text));

            Ok(TransitionResult::new(SessionState::Sending { sent: attachments })
                .with_effects(optimistic)
                .with_effect(Effect::ClearComposer)
                .with_effect(Effect::Dispatch(route)))
        }

        (SessionState::Sending { sent }, Event::Resolved { outcome: Ok(answer) }) => {
            let notice = (!sent.is_empty()).then(|| Effect::document_notice(sent));
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effects(notice)
                .with_effect(Effect::bot_answer(answer.answer)))
        }

        (SessionState::Sending { .. }, Event::Resolved { outcome: Err(e) }) => {
            Ok(TransitionResult::new(SessionState::Idle).with_effect(Effect::bot_error(e.message())))
        }

        (SessionState::Idle, Event::Resolved { .. }) => Err(TransitionError::InvalidTransition(
            "outcome received with no request in flight".to_string(),
        )),
    }
}
