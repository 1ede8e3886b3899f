//! Daily-bucket comment aggregate (fallback provider)

use super::{normalize_source, MentionProvider, MentionWindow, ProviderError};
use crate::config::{MentionsConfig, ARCTIC_SHIFT_URL};
use crate::http::HttpFetch;
use crate::json::count_lenient;
use crate::telemetry::{self, RequestOutcome};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Configuration for the bucket-aggregate provider
#[derive(Debug, Clone)]
pub struct BucketConfig {
    /// Archive base URL
    pub base_url: String,
    /// Attempts per term
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled each time after
    pub base_delay: Duration,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            base_url: ARCTIC_SHIFT_URL.to_string(),
            max_attempts: 2,
            base_delay: Duration::from_millis(400),
        }
    }
}

impl From<&MentionsConfig> for BucketConfig {
    fn from(config: &MentionsConfig) -> Self {
        Self {
            base_url: config.aggregate_base_url.clone(),
            max_attempts: config.aggregate_max_attempts.max(1),
            base_delay: Duration::from_millis(config.aggregate_base_delay_ms),
        }
    }
}

/// Daily comment counts summed over the window
pub struct BucketProvider {
    http: Arc<dyn HttpFetch>,
    config: BucketConfig,
}

impl BucketProvider {
    /// Create a provider over the given HTTP client
    pub fn new(http: Arc<dyn HttpFetch>, config: BucketConfig) -> Self {
        Self { http, config }
    }

    fn url(&self) -> String {
        format!(
            "{}/api/comments/search/aggregate",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn count_term(
        &self,
        source: &str,
        term: &str,
        window: &MentionWindow,
    ) -> Result<u64, ProviderError> {
        let url = self.url();
        let query = [
            ("aggregate", "created_utc".to_string()),
            ("frequency", "day".to_string()),
            ("subreddit", source.to_string()),
            ("body", term.to_string()),
            ("after", window.start_date()),
            ("before", window.end_date()),
        ];

        let mut delay = self.config.base_delay;
        let mut last_error = ProviderError::Status(0);

        for attempt in 1..=self.config.max_attempts {
            let started = Instant::now();
            match self.http.get(&url, &query).await {
                Ok(response) if response.is_success() => {
                    telemetry::record_provider_request(
                        self.name(),
                        RequestOutcome::Ok,
                        started.elapsed(),
                    );
                    return Ok(match response.json() {
                        Ok(payload) => sum_doc_counts(&payload),
                        Err(e) => {
                            tracing::warn!(source, term, error = %e, "Malformed aggregate response");
                            0
                        }
                    });
                }
                Ok(response) if response.is_client_error() => {
                    telemetry::record_provider_request(
                        self.name(),
                        RequestOutcome::Failed,
                        started.elapsed(),
                    );
                    return Err(ProviderError::NotIndexed(response.status));
                }
                Ok(response) => {
                    let outcome = if response.is_rate_limited() {
                        RequestOutcome::RateLimited
                    } else {
                        RequestOutcome::Failed
                    };
                    telemetry::record_provider_request(self.name(), outcome, started.elapsed());
                    last_error = ProviderError::Status(response.status);
                }
                Err(e) => {
                    telemetry::record_provider_request(
                        self.name(),
                        RequestOutcome::Failed,
                        started.elapsed(),
                    );
                    last_error = e.into();
                }
            }

            if attempt < self.config.max_attempts {
                tracing::debug!(
                    source,
                    term,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "Aggregate request failed, backing off"
                );
                sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
        }

        Err(ProviderError::Exhausted {
            attempts: self.config.max_attempts,
            last: Box::new(last_error),
        })
    }
}

#[async_trait]
impl MentionProvider for BucketProvider {
    fn name(&self) -> &'static str {
        "buckets"
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

/// Bucket list from any of the three response shapes
///
/// A bare list, `{"buckets": [...]}`, or
/// `{"aggregations": {"<field>": {"buckets": [...]}}}`.
fn extract_buckets(payload: &Value) -> &[Value] {
    if let Some(list) = payload.as_array() {
        return list;
    }
    if let Some(list) = payload.get("buckets").and_then(Value::as_array) {
        return list;
    }
    if let Some(aggregations) = payload.get("aggregations").and_then(Value::as_object) {
        for inner in aggregations.values() {
            if let Some(list) = inner.get("buckets").and_then(Value::as_array) {
                return list;
            }
        }
    }
    &[]
}

/// Sum of `doc_count` across all buckets; anything unexpected counts as zero
///
/// The sum saturates at `u64::MAX`.
pub fn sum_doc_counts(payload: &Value) -> u64 {
    extract_buckets(payload)
        .iter()
        .map(|bucket| bucket.get("doc_count").map_or(0, count_lenient))
        .fold(0u64, u64::saturating_add)
}
