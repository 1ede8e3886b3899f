//! Paginated post search (primary provider)
//!
//! Walks the archive's post search newest-first, moving a `before` cursor to
//! the oldest item of each page until a short page or the page ceiling.

use super::{normalize_source, MentionProvider, MentionWindow, Pacer, ProviderError};
use crate::config::{MentionsConfig, ARCTIC_SHIFT_URL};
use crate::http::HttpFetch;
use crate::json::{i64_lenient, string_lenient};
use crate::telemetry::{self, RequestOutcome};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Configuration for the paginated search provider
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Archive base URL
    pub base_url: String,
    /// Items requested per page
    pub page_size: usize,
    /// Page ceiling per term
    pub max_pages: usize,
    /// Sleep after a 429 before retrying the same page
    pub rate_limit_backoff: Duration,
    /// 429 retries per page
    pub max_rate_limit_retries: u32,
    /// Minimum spacing between requests
    pub min_request_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: ARCTIC_SHIFT_URL.to_string(),
            page_size: 100,
            max_pages: 10,
            rate_limit_backoff: Duration::from_secs(5),
            max_rate_limit_retries: 3,
            min_request_interval: super::MIN_REQUEST_INTERVAL,
        }
    }
}

impl From<&MentionsConfig> for SearchConfig {
    fn from(config: &MentionsConfig) -> Self {
        Self {
            base_url: config.search_base_url.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            rate_limit_backoff: Duration::from_millis(config.rate_limit_backoff_ms),
            max_rate_limit_retries: config.max_rate_limit_retries,
            min_request_interval: Duration::from_millis(config.min_request_interval_ms),
        }
    }
}

/// One search hit; only identity and timestamp matter for counting
#[derive(Debug, Clone, PartialEq, Eq)]
struct PostItem {
    id: Option<String>,
    created_utc: Option<i64>,
}

/// Paginated post search over a Reddit archive
pub struct SearchProvider {
    http: Arc<dyn HttpFetch>,
    config: SearchConfig,
    pacer: Pacer,
}

impl SearchProvider {
    /// Create a provider over the given HTTP client
    pub fn new(http: Arc<dyn HttpFetch>, config: SearchConfig) -> Self {
        let pacer = Pacer::new(config.min_request_interval);
        Self {
            http,
            config,
            pacer,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/api/posts/search",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn count_term(
        &self,
        source: &str,
        term: &str,
        window: &MentionWindow,
    ) -> Result<u64, ProviderError> {
        let after = window.start.timestamp();
        let mut cursor = window.end.timestamp();
        let mut seen: HashSet<String> = HashSet::new();
        let mut total = 0u64;

        for page in 0..self.config.max_pages {
            let Some(items) = self.fetch_page(source, term, after, cursor).await? else {
                tracing::warn!(
                    source,
                    term,
                    page,
                    "Malformed search page, keeping count so far"
                );
                break;
            };

            let mut oldest: Option<i64> = None;
            for item in &items {
                let fresh = match &item.id {
                    Some(id) => seen.insert(id.clone()),
                    None => true,
                };
                if fresh {
                    total += 1;
                }
                if let Some(ts) = item.created_utc {
                    oldest = Some(oldest.map_or(ts, |o| o.min(ts)));
                }
            }

            tracing::debug!(source, term, page, items = items.len(), total, "Search page");

            if items.len() < self.config.page_size {
                break;
            }
            match oldest {
                Some(ts) if ts < cursor => cursor = ts,
                // Cursor would not move; another request would return the same page
                _ => break,
            }
        }

        Ok(total)
    }

    /// One page; `Ok(None)` when the body has no usable `data` array
    async fn fetch_page(
        &self,
        source: &str,
        term: &str,
        after: i64,
        before: i64,
    ) -> Result<Option<Vec<PostItem>>, ProviderError> {
        let url = self.url();
        let query = [
            ("subreddit", source.to_string()),
            ("title", term.to_string()),
            ("after", after.to_string()),
            ("before", before.to_string()),
            ("limit", self.config.page_size.to_string()),
            ("sort", "desc".to_string()),
        ];

        let mut rate_limited = 0u32;
        loop {
            self.pacer.ready().await;
            let started = Instant::now();

            let response = match self.http.get(&url, &query).await {
                Ok(response) => response,
                Err(e) => {
                    telemetry::record_provider_request(
                        self.name(),
                        RequestOutcome::Failed,
                        started.elapsed(),
                    );
                    return Err(e.into());
                }
            };

            if response.is_rate_limited() {
                telemetry::record_provider_request(
                    self.name(),
                    RequestOutcome::RateLimited,
                    started.elapsed(),
                );
                rate_limited += 1;
                if rate_limited > self.config.max_rate_limit_retries {
                    return Err(ProviderError::RateLimited {
                        retries: self.config.max_rate_limit_retries,
                    });
                }
                tracing::warn!(
                    source,
                    term,
                    retry = rate_limited,
                    backoff_ms = self.config.rate_limit_backoff.as_millis() as u64,
                    "Rate limited, retrying same page"
                );
                sleep(self.config.rate_limit_backoff).await;
                continue;
            }

            if !response.is_success() {
                telemetry::record_provider_request(
                    self.name(),
                    RequestOutcome::Failed,
                    started.elapsed(),
                );
                return Err(ProviderError::Status(response.status));
            }

            telemetry::record_provider_request(self.name(), RequestOutcome::Ok, started.elapsed());
            return Ok(parse_page(&response.body));
        }
    }
}

#[async_trait]
impl MentionProvider for SearchProvider {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn count(
        &self,
        source: &str,
        terms: &[String],
        window: &MentionWindow,
    ) -> Result<u64, ProviderError> {
        let source = normalize_source(source);
        let mut total = 0;
        for term in terms.iter().filter(|t| !t.trim().is_empty()) {
            let count = self.count_term(&source, term.trim(), window).await?;
            total = u64::saturating_add(total, count);
        }
        Ok(total)
    }
}

fn parse_page(body: &str) -> Option<Vec<PostItem>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let data = value.get("data")?.as_array()?;
    Some(
        data.iter()
            .map(|item| PostItem {
                id: item.get("id").and_then(string_lenient),
                created_utc: item.get("created_utc").and_then(i64_lenient),
            })
            .collect(),
    )
}
