//! HTTP transport for the question-answering service

use super::types::{AnswerEnvelope, TokenResponse};
use super::{Answer, Attachment, AuthError, AuthMode, AuthResponse, Credentials, RequestError, Transport};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Paths of the remote operations, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub query: String,
    pub upload: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            register: "/register".to_string(),
            query: "/chat".to_string(),
            upload: "/upload".to_string(),
        }
    }
}

/// Transport over HTTP with bearer authentication
pub struct HttpTransport {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        Self::with_endpoints(base_url, timeout, Endpoints::default())
    }

    pub fn with_endpoints(
        base_url: &str,
        timeout: Duration,
        endpoints: Endpoints,
    ) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send and read the whole body, mapping non-success statuses to errors
    async fn execute(&self, request: RequestBuilder) -> Result<String, RequestError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(RequestError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn answer(&self, request: RequestBuilder) -> Result<Answer, RequestError> {
        let body = self.execute(request).await?;
        let envelope: AnswerEnvelope = serde_json::from_str(&body)
            .map_err(|e| RequestError::unknown(format!("Failed to parse response: {e}")))?;

        match envelope {
            AnswerEnvelope {
                answer: Some(answer),
                ..
            } => Ok(Answer { answer }),
            AnswerEnvelope {
                error: Some(error), ..
            } => Err(RequestError::reported(error)),
            _ => Err(RequestError::unknown("Malformed response: no answer")),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError> {
        let path = match mode {
            AuthMode::Login => &self.endpoints.login,
            AuthMode::Register => &self.endpoints.register,
        };
        let body = self
            .execute(self.client.post(self.url(path)).json(credentials))
            .await?;

        match mode {
            AuthMode::Register => Ok(AuthResponse::default()),
            AuthMode::Login => {
                let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
                    RequestError::unknown(format!("Failed to parse login response: {e}"))
                })?;
                Ok(AuthResponse {
                    token: Some(parsed.access_token),
                })
            }
        }
    }

    async fn send_query(&self, token: &str, text: &str) -> Result<Answer, RequestError> {
        let request = self
            .client
            .post(self.url(&self.endpoints.query))
            .bearer_auth(token)
            .query(&[("query", text)]);
        self.answer(request).await
    }

    async fn send_attachments(
        &self,
        token: &str,
        files: &[Attachment],
        text: Option<&str>,
    ) -> Result<Answer, RequestError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::stream_with_length(file.payload.clone(), file.size() as u64)
                .file_name(file.name.clone())
                .mime_str(&file.media_type())?;
            form = form.part("files", part);
        }
        if let Some(text) = text {
            form = form.text("query", text.to_string());
        }

        let request = self
            .client
            .post(self.url(&self.endpoints.upload))
            .bearer_auth(token)
            .multipart(form);
        self.answer(request).await
    }
}
