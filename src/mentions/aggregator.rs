//! Mention aggregation across sources with provider fallback and a time budget

use super::{BucketConfig, BucketProvider, MentionProvider, MentionWindow, SearchConfig, SearchProvider};
use crate::config::Config;
use crate::extract::{EntityExtractor, TermStrategy};
use crate::http::HttpFetch;
use crate::telemetry;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Count contributed by one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
    /// Provider that produced a non-zero count, if any did
    pub provider: Option<String>,
}

/// Breakdown of one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MentionReport {
    pub terms: Vec<String>,
    pub total: u64,
    pub sources: Vec<SourceCount>,
    /// Sources left unqueried when the time budget ran out
    pub skipped: usize,
}

/// Sums mention counts over sources, falling back per source when the
/// primary provider yields nothing
pub struct MentionAggregator {
    primary: Arc<dyn MentionProvider>,
    fallback: Option<Arc<dyn MentionProvider>>,
    extractor: EntityExtractor,
    strategy: TermStrategy,
}

impl MentionAggregator {
    /// Aggregator with a single provider
    pub fn new(primary: Arc<dyn MentionProvider>, extractor: EntityExtractor) -> Self {
        Self {
            primary,
            fallback: None,
            extractor,
            strategy: TermStrategy::default(),
        }
    }

    /// Provider consulted when the primary yields zero or fails
    pub fn with_fallback(mut self, fallback: Arc<dyn MentionProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// How terms are derived when the caller supplies none
    pub fn with_strategy(mut self, strategy: TermStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Paginated search backed by the bucket aggregate, from configuration
    pub fn from_config(http: Arc<dyn HttpFetch>, config: &Config) -> Self {
        let primary = SearchProvider::new(http.clone(), SearchConfig::from(&config.mentions));
        let fallback = BucketProvider::new(http, BucketConfig::from(&config.mentions));
        Self::new(
            Arc::new(primary),
            EntityExtractor::from_config(&config.extractor),
        )
        .with_fallback(Arc::new(fallback))
        .with_strategy(config.mentions.term_strategy)
    }

    /// Extractor used to derive terms
    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    /// Terms the aggregator would search for `question`
    pub fn terms_for(&self, question: &str) -> Vec<String> {
        self.extractor.terms(question, self.strategy)
    }

    /// Total mentions across `sources`; see [`MentionAggregator::aggregate_detailed`]
    pub async fn aggregate(
        &self,
        question: &str,
        terms: Option<&[String]>,
        sources: &[String],
        window: &MentionWindow,
        budget: Duration,
    ) -> u64 {
        self.aggregate_detailed(question, terms, sources, window, budget)
            .await
            .total
    }

    /// Per-source breakdown of an aggregation
    ///
    /// Never fails: provider errors count as zero. Sources are visited in
    /// order and the budget is checked before each one, so the result is the
    /// partial sum of the sources reached in time.
    pub async fn aggregate_detailed(
        &self,
        question: &str,
        terms: Option<&[String]>,
        sources: &[String],
        window: &MentionWindow,
        budget: Duration,
    ) -> MentionReport {
        let started = Instant::now();
        let terms: Vec<String> = match terms {
            Some(terms) => terms
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            None => self.terms_for(question),
        };

        let mut report = MentionReport {
            terms,
            ..MentionReport::default()
        };

        if report.terms.is_empty() {
            tracing::debug!(question, "No search terms, mention count is zero");
            return report;
        }
        if window.is_empty() {
            tracing::debug!(question, "Empty mention window, mention count is zero");
            return report;
        }

        for (index, source) in sources.iter().enumerate() {
            if started.elapsed() >= budget {
                report.skipped = sources.len() - index;
                tracing::warn!(
                    question,
                    skipped = report.skipped,
                    budget_ms = budget.as_millis() as u64,
                    partial = report.total,
                    "Mention time budget exhausted"
                );
                telemetry::record_sources_skipped(report.skipped);
                break;
            }

            let mut entry = SourceCount {
                source: source.clone(),
                count: 0,
                provider: None,
            };

            let primary = self.count_with(self.primary.as_ref(), source, &report.terms, window).await;
            if primary > 0 {
                entry.count = primary;
                entry.provider = Some(self.primary.name().to_string());
            } else if let Some(fallback) = &self.fallback {
                let count = self.count_with(fallback.as_ref(), source, &report.terms, window).await;
                if count > 0 {
                    entry.count = count;
                    entry.provider = Some(fallback.name().to_string());
                }
            }

            report.total = report.total.saturating_add(entry.count);
            report.sources.push(entry);
        }

        tracing::debug!(
            question,
            terms = ?report.terms,
            total = report.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Mentions aggregated"
        );
        report
    }

    async fn count_with(
        &self,
        provider: &dyn MentionProvider,
        source: &str,
        terms: &[String],
        window: &MentionWindow,
    ) -> u64 {
        match provider.count(source, terms, window).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    source,
                    error = %e,
                    "Mention provider failed, counting zero"
                );
                telemetry::record_provider_failure(provider.name(), e.kind());
                0
            }
        }
    }
}
