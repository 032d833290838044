//! Common types for talking to the question-answering service

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Which credential call to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Register => "register",
        }
    }
}

/// Username/password pair sent to the auth endpoints
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a successful authenticate call.
///
/// Registration never carries a token; the caller logs in afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: Option<String>,
}

/// Answer returned for a query or an attachment upload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Answer {
    pub answer: String,
}

impl Answer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// A file staged for the next send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub payload: Bytes,
}

/// Errors loading an attachment from disk
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Not a file: {0}")]
    NotAFile(String),
}

impl Attachment {
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// Read a file into memory; the display name is the file name component
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AttachmentError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AttachmentError::NotAFile(display.clone()))?;

        let payload = tokio::fs::read(path)
            .await
            .map_err(|source| AttachmentError::Read {
                path: display,
                source,
            })?;

        Ok(Self::new(name, payload))
    }

    /// Media type guessed from the name, used for the multipart part
    pub fn media_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Body returned by `/login`
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Body of a 2xx reply to `/chat` or `/upload`.
///
/// The service sometimes reports failures in-band with an `error` field.
#[derive(Debug, Deserialize)]
pub(crate) struct AnswerEnvelope {
    #[serde(default)]
    pub answer: Option<String>,
    /// Same shapes as an error body's `detail`
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}
