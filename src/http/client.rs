//! reqwest-backed fetcher

use super::{HttpError, HttpFetch, HttpResponse};
use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// [`HttpFetch`] over a shared `reqwest::Client` with bounded timeouts
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build a client from HTTP configuration
    ///
    /// Fails only on invalid configuration, which is fatal at startup.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let connect = Duration::from_millis(config.connect_timeout_ms);
        let read = Duration::from_millis(config.read_timeout_ms);

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(connect)
            .timeout(connect + read)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, HttpError> {
        tracing::trace!(url = %url, params = query.len(), "GET");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_from_default_config() {
        let fetcher = ReqwestFetcher::new(&HttpConfig::default());
        assert!(fetcher.is_ok());
    }
}
