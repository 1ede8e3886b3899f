//! HTTP plumbing shared by the mention providers
//!
//! Providers never talk to `reqwest` directly. They take an [`HttpFetch`]
//! so callers decide base URLs, timeouts and user agent, and tests can
//! replay canned responses.

mod client;
mod scripted;
mod types;

pub use client::ReqwestFetcher;
pub use scripted::{RecordedRequest, ScriptedFetcher};
pub use types::{HttpError, HttpResponse};

use async_trait::async_trait;

/// Minimal GET capability used by the providers
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Issue a GET request with the given query parameters
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, HttpError>;
}
