//! Mock implementations for testing
//!
//! These mocks enable runtime tests without real I/O.

use crate::transport::{
    Answer, Attachment, AuthError, AuthMode, AuthResponse, Credentials, RequestError, Transport,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A recorded attachment upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub token: String,
    pub files: Vec<String>,
    pub text: Option<String>,
}

/// Mock transport that returns queued outcomes in order
#[allow(dead_code)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<Answer, RequestError>>>,
    queries: Mutex<Vec<(String, String)>>,
    uploads: Mutex<Vec<RecordedUpload>>,
    /// When set, every call waits for [`MockTransport::release`]
    gate: Option<Arc<Notify>>,
    /// Notified when a call starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            gate: None,
            request_started: Arc::new(Notify::new()),
        }
    }

    /// Hold every call until released
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn queue_answer(&self, answer: Answer) {
        self.outcomes.lock().unwrap().push_back(Ok(answer));
    }

    pub fn queue_error(&self, error: RequestError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len() + self.uploads.lock().unwrap().len()
    }

    async fn next_outcome(&self) -> Result<Answer, RequestError> {
        self.request_started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::network("No mock response queued")))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn authenticate(
        &self,
        mode: AuthMode,
        _credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError> {
        Ok(AuthResponse {
            token: (mode == AuthMode::Login).then(|| "mock-token".to_string()),
        })
    }

    async fn send_query(&self, token: &str, text: &str) -> Result<Answer, RequestError> {
        self.queries
            .lock()
            .unwrap()
            .push((token.to_string(), text.to_string()));
        self.next_outcome().await
    }

    async fn send_attachments(
        &self,
        token: &str,
        files: &[Attachment],
        text: Option<&str>,
    ) -> Result<Answer, RequestError> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            token: token.to_string(),
            files: files.iter().map(|f| f.name.clone()).collect(),
            text: text.map(ToString::to_string),
        });
        self.next_outcome().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_returns_queued_outcomes() {
        let mock = MockTransport::new();
        mock.queue_answer(Answer::new("first"));

        let answer = mock.send_query("tok", "q").await.unwrap();
        assert_eq!(answer.answer, "first");

        // Second call should fail (no more responses)
        let result = mock.send_query("tok", "q").await;
        assert!(result.is_err());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_authenticate() {
        let mock = MockTransport::new();
        let creds = Credentials::new("u", "p");
        let login = mock.authenticate(AuthMode::Login, &creds).await.unwrap();
        let register = mock.authenticate(AuthMode::Register, &creds).await.unwrap();
        assert_eq!(login.token.as_deref(), Some("mock-token"));
        assert_eq!(register.token, None);
    }
}
