//! Social-mention counting
//!
//! A [`MentionProvider`] counts posts or comments matching a set of search
//! terms in one source over a time window. Two providers exist: a paginated
//! post search and a daily-bucket comment aggregate used as fallback. The
//! [`MentionAggregator`] walks a list of sources under a wall-clock budget
//! and sums whatever it gets; provider failures never reach the caller.

mod aggregator;
mod buckets;
mod pacer;
mod search;
mod sources;
mod types;

pub use aggregator::{MentionAggregator, MentionReport, SourceCount};
pub use buckets::{sum_doc_counts, BucketConfig, BucketProvider};
pub use pacer::Pacer;
pub use search::{SearchConfig, SearchProvider};
pub use sources::{normalize_source, SourceDirectory, SubredditInfo};
pub use types::{MentionWindow, ProviderError};

use crate::config::Config;
use crate::http::HttpFetch;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Curated Premier League communities, queried in this order
pub const EPL_SOURCES: &[&str] = &[
    "PremierLeague",
    "soccer",
    "football",
    "FantasyPL",
    "Championship",
];

/// Default spacing between consecutive search requests
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Counts mentions of a term set in one source
#[async_trait]
pub trait MentionProvider: Send + Sync {
    /// Short name used in logs, metrics and reports
    fn name(&self) -> &'static str;

    /// Mentions of any of `terms` in `source` during `window`
    ///
    /// An empty term list returns `Ok(0)` without a request.
    async fn count(
        &self,
        source: &str,
        terms: &[String],
        window: &MentionWindow,
    ) -> Result<u64, ProviderError>;
}

/// Total mentions for a question over the configured sources
///
/// Builds the configured provider chain and extractor, then aggregates under
/// the configured time budget.
pub async fn aggregate_mentions(
    http: Arc<dyn HttpFetch>,
    config: &Config,
    question: &str,
    window: &MentionWindow,
) -> u64 {
    let aggregator = MentionAggregator::from_config(http, config);
    aggregator
        .aggregate(
            question,
            None,
            &config.mentions.sources,
            window,
            time_budget(config),
        )
        .await
}

/// Configured aggregation budget; non-finite or negative values mean zero
pub fn time_budget(config: &Config) -> Duration {
    Duration::try_from_secs_f64(config.mentions.time_budget_secs).unwrap_or(Duration::ZERO)
}
