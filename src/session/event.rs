//! Events that drive the session state machine

use crate::transport::{Answer, RequestError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The user pressed send
    Submit {
        text: String,
        /// Names of the attachments pending at the moment of submission
        attachments: Vec<String>,
    },
    /// The outstanding transport call finished
    Resolved {
        outcome: Result<Answer, RequestError>,
    },
}
