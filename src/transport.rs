//! Transport abstraction for the question-answering service
//!
//! A thin, stateless seam: each call translates one logical operation into a
//! wire request and normalizes the outcome. Callers never see status codes or
//! header names.

mod error;
mod http;
mod types;

#[cfg(test)]
mod proptests;

pub use error::{AuthError, ErrorDetail, RequestError, RequestErrorKind};
pub use http::{Endpoints, HttpTransport};
pub use types::{Answer, Attachment, AttachmentError, AuthMode, AuthResponse, Credentials};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Remote operations of the question-answering service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Log in or register; only a login returns a token
    async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError>;

    /// Ask a text question
    async fn send_query(&self, token: &str, text: &str) -> Result<Answer, RequestError>;

    /// Upload files, with optional accompanying text, as one turn
    async fn send_attachments(
        &self,
        token: &str,
        files: &[Attachment],
        text: Option<&str>,
    ) -> Result<Answer, RequestError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError> {
        (**self).authenticate(mode, credentials).await
    }

    async fn send_query(&self, token: &str, text: &str) -> Result<Answer, RequestError> {
        (**self).send_query(token, text).await
    }

    async fn send_attachments(
        &self,
        token: &str,
        files: &[Attachment],
        text: Option<&str>,
    ) -> Result<Answer, RequestError> {
        (**self).send_attachments(token, files, text).await
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    fn log_outcome<R>(operation: &str, started: Instant, result: &Result<R, RequestError>) {
        let duration = started.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    "Request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e,
                    "Request failed"
                );
            }
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError> {
        let started = Instant::now();
        let result = self.inner.authenticate(mode, credentials).await;
        Self::log_outcome(mode.as_str(), started, &result);
        result
    }

    async fn send_query(&self, token: &str, text: &str) -> Result<Answer, RequestError> {
        let started = Instant::now();
        let result = self.inner.send_query(token, text).await;
        Self::log_outcome("query", started, &result);
        result
    }

    async fn send_attachments(
        &self,
        token: &str,
        files: &[Attachment],
        text: Option<&str>,
    ) -> Result<Answer, RequestError> {
        tracing::debug!(
            files = files.len(),
            bytes = files.iter().map(Attachment::size).sum::<usize>(),
            with_text = text.is_some(),
            "Uploading attachments"
        );
        let started = Instant::now();
        let result = self.inner.send_attachments(token, files, text).await;
        Self::log_outcome("attachments", started, &result);
        result
    }
}
