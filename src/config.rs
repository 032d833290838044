//! Client configuration

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_GREETING: &str = "Hello! Welcome to Vaani, your policy assistant. How can I help you today?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
}

/// Configuration for the client
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Bearer token; when absent the CLI logs in with the credentials
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// First bot message; `None` opens with an empty transcript
    pub greeting: Option<String>,
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token: None,
            username: None,
            password: None,
            greeting: Some(DEFAULT_GREETING.to_string()),
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Read the environment. The base URL is checked by [`Self::validate`]
    /// once any overrides have been applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match get("VAANI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    var: "VAANI_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => defaults.timeout,
        };

        let log_json = match get("VAANI_LOG_JSON").as_deref().map(str::trim) {
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") | None => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "VAANI_LOG_JSON",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            base_url: get("VAANI_BASE_URL").unwrap_or(defaults.base_url),
            timeout,
            token: get("VAANI_TOKEN"),
            username: get("VAANI_USERNAME"),
            password: get("VAANI_PASSWORD"),
            greeting: get("VAANI_GREETING").or(defaults.greeting),
            log_json,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidBaseUrl(self.base_url.clone()))
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("greeting", &self.greeting)
            .field("log_json", &self.log_json)
            .finish()
    }
}
