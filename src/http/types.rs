//! HTTP response and error types

use thiserror::Error;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// Create a response with the given status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 Too Many Requests
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// 4xx other than 429; the upstream refuses the query and retrying won't help
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status) && !self.is_rate_limited()
    }

    /// Parse the body as loosely-typed JSON
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Transport-level failures (no status code was received)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// Connect or read timeout elapsed
    #[error("request timed out")]
    Timeout,
    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(String),
    /// Client could not be constructed from configuration
    #[error("invalid HTTP client configuration: {0}")]
    Build(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}
