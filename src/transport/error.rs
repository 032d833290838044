//! Request error types and display normalization
//!
//! The service reports failure detail in several incompatible shapes. Each
//! shape is captured as an [`ErrorDetail`] variant and rendered to exactly one
//! non-empty display string by [`ErrorDetail::display_message`].

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message used when a failure carries nothing renderable
const GENERIC_FAILURE: &str = "Something went wrong";

/// Failure detail as reported by the service or the transport
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// A list of sub-errors, e.g. validation errors with a `msg` each
    List(Vec<Value>),
    /// A single structured error object
    Object(serde_json::Map<String, Value>),
    /// A plain string detail
    Text(String),
    /// No server detail; connection, timeout or status-level description
    Transport(String),
}

impl ErrorDetail {
    /// Classify a `detail` value from an error body.
    ///
    /// `fallback` is the transport-level description used when the value
    /// carries no renderable detail (missing, null, or empty).
    pub fn from_value(value: Option<Value>, fallback: impl Into<String>) -> Self {
        let detail = match value {
            Some(Value::Array(items)) => ErrorDetail::List(items),
            Some(Value::Object(map)) => ErrorDetail::Object(map),
            Some(Value::String(text)) => ErrorDetail::Text(text),
            Some(Value::Null) | None => return ErrorDetail::Transport(fallback.into()),
            Some(other) => ErrorDetail::Text(other.to_string()),
        };

        if detail.render().trim().is_empty() {
            ErrorDetail::Transport(fallback.into())
        } else {
            detail
        }
    }

    /// Extract and classify the `detail` field of a raw response body
    pub fn from_body(body: &str, fallback: impl Into<String>) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| match v {
                Value::Object(mut map) => map.remove("detail"),
                _ => None,
            });
        Self::from_value(detail, fallback)
    }

    /// Render to a single display string.
    ///
    /// Precedence is list, object, string, transport. A detail that still
    /// renders empty is replaced by a generic message.
    pub fn display_message(&self) -> String {
        let rendered = self.render();
        if rendered.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            rendered
        }
    }

    fn render(&self) -> String {
        match self {
            ErrorDetail::List(items) => items
                .iter()
                .map(sub_error_message)
                .filter(|m| !m.trim().is_empty())
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Object(map) if map.is_empty() => String::new(),
            ErrorDetail::Object(map) => {
                serde_json::to_string(map).unwrap_or_else(|_| format!("{map:?}"))
            }
            ErrorDetail::Text(text) => text.clone(),
            ErrorDetail::Transport(message) => message.clone(),
        }
    }
}

fn sub_error_message(item: &Value) -> String {
    match item.get("msg") {
        Some(Value::String(msg)) => msg.clone(),
        _ => match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// Error classification, derived from the HTTP status when there is one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestErrorKind {
    /// Connection failures and timeouts
    Network,
    /// Missing, invalid or expired credentials (401, 403)
    Auth,
    /// Rejected input (400, 404, 413, 415, 422)
    InvalidRequest,
    /// Rate limited (429)
    RateLimit,
    /// Server error (5xx)
    Server,
    /// Anything else, including malformed replies
    Unknown,
}

impl RequestErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            400 | 404 | 413 | 415 | 422 => Self::InvalidRequest,
            429 => Self::RateLimit,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }
}

/// A failed call, normalized
#[derive(Debug, Clone, Error)]
#[error("{}", .detail.display_message())]
pub struct RequestError {
    pub kind: RequestErrorKind,
    pub detail: ErrorDetail,
    pub status: Option<u16>,
}

/// Authentication failures share the request error shape
pub type AuthError = RequestError;

impl RequestError {
    pub fn new(kind: RequestErrorKind, detail: ErrorDetail) -> Self {
        Self {
            kind,
            detail,
            status: None,
        }
    }

    /// Build from a non-success HTTP reply
    pub fn from_response(status: u16, body: &str) -> Self {
        let fallback = format!("Request failed with status code {status}");
        Self {
            kind: RequestErrorKind::from_status(status),
            detail: ErrorDetail::from_body(body, fallback),
            status: Some(status),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Network, ErrorDetail::Transport(message.into()))
    }

    /// In-band failure reported inside a successful reply
    pub fn reported(error: Value) -> Self {
        Self::new(
            RequestErrorKind::Server,
            ErrorDetail::from_value(Some(error), "The service reported an error"),
        )
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Unknown, ErrorDetail::Transport(message.into()))
    }

    /// The single display string for this failure
    pub fn message(&self) -> String {
        self.detail.display_message()
    }

    pub fn is_auth(&self) -> bool {
        self.kind == RequestErrorKind::Auth
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::network(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::network(format!("Connection failed: {e}"))
        } else if e.is_decode() {
            Self::unknown(format!("Failed to parse response: {e}"))
        } else {
            Self::unknown(format!("Request failed: {e}"))
        }
    }
}
