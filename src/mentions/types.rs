//! Mention provider types

use crate::http::HttpError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Time window a mention count covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionWindow {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// End of the window, usually "now"
    pub end: DateTime<Utc>,
}

impl MentionWindow {
    /// Create a window
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window from `start` until now
    pub fn since(start: DateTime<Utc>) -> Self {
        Self::new(start, Utc::now())
    }

    /// A window that ends before it starts covers nothing
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Start as `YYYY-MM-DD`
    pub fn start_date(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End as `YYYY-MM-DD`
    pub fn end_date(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// A provider call that produced no usable count
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Still rate limited after the allowed retries
    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },
    /// Non-success status other than 429
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    /// Client-side rejection; the query is not indexed upstream
    #[error("query not indexed upstream (HTTP {0})")]
    NotIndexed(u16),
    /// Retries used up
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<ProviderError>,
    },
    /// Transport failure
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ProviderError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::Status(_) => "status",
            ProviderError::NotIndexed(_) => "not_indexed",
            ProviderError::Exhausted { .. } => "exhausted",
            ProviderError::Http(_) => "transport",
        }
    }
}
