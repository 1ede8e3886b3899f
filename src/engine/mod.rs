//! Per-market scoring pipeline
//!
//! question → terms → mentions → speculation ratio, trades → whale ratio,
//! both ratios + baseline → risk score. Markets are scored one after another
//! and ranked riskiest first.

mod report;

pub use report::{rank, MarketRiskReport};

use crate::config::{Config, MAX_WINDOW_DAYS};
use crate::http::HttpFetch;
use crate::market::{Market, Trade};
use crate::mentions::{self, MentionAggregator, MentionReport, MentionWindow};
use crate::risk::{Baseline, RiskComposer};
use crate::signal::{trades_in_window, SpeculationScorer, WhaleScorer};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// A market with its trade history
#[derive(Debug, Clone)]
pub struct MarketInput {
    pub market: Market,
    pub trades: Vec<Trade>,
}

/// Scores markets end to end
pub struct RiskEngine {
    aggregator: MentionAggregator,
    whale: WhaleScorer,
    speculation: SpeculationScorer,
    composer: RiskComposer,
    baseline: Option<Baseline>,
    sources: Vec<String>,
    budget: Duration,
    trade_window: chrono::Duration,
    count_trades: bool,
}

impl RiskEngine {
    /// Engine over a prepared aggregator, with everything else from configuration
    pub fn new(aggregator: MentionAggregator, config: &Config) -> Self {
        Self {
            aggregator,
            whale: WhaleScorer::from_config(&config.whale),
            speculation: SpeculationScorer,
            composer: RiskComposer::from_config(&config.risk),
            baseline: config.baseline,
            sources: config.mentions.sources.clone(),
            budget: mentions::time_budget(config),
            trade_window: chrono::Duration::days(
                config.whale.window_days.clamp(1, MAX_WINDOW_DAYS),
            ),
            count_trades: false,
        }
    }

    /// Engine with the configured provider chain over `http`
    pub fn from_config(http: Arc<dyn HttpFetch>, config: &Config) -> Self {
        Self::new(MentionAggregator::from_config(http, config), config)
    }

    /// Replace the population averages
    pub fn with_baseline(mut self, baseline: Option<Baseline>) -> Self {
        self.baseline = baseline;
        self
    }

    /// Fill `Market::trade_count` from the supplied trades before scoring
    pub fn with_trade_counting(mut self, enabled: bool) -> Self {
        self.count_trades = enabled;
        self
    }

    /// Baseline in use
    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    /// Score one market as of `now`
    ///
    /// Mentions are counted from the market's start until `now`; trades are
    /// taken from the trailing window ending at `now`.
    pub async fn score_market(
        &self,
        market: &Market,
        trades: &[Trade],
        now: DateTime<Utc>,
    ) -> MarketRiskReport {
        let trade_start = now - self.trade_window;
        let market = if self.count_trades {
            market
                .clone()
                .with_trade_count(trades_in_window(trades, trade_start, now))
        } else {
            market.clone()
        };

        let terms = self.aggregator.terms_for(&market.question);
        let (mentions, speculation) = if terms.is_empty() {
            tracing::info!(market_id = %market.id, question = %market.question, "No entity found");
            (MentionReport::default(), self.speculation.no_signal(&market))
        } else {
            let window = MentionWindow::new(market.start_date, now);
            let report = self
                .aggregator
                .aggregate_detailed(&market.question, Some(&terms), &self.sources, &window, self.budget)
                .await;
            let score = self.speculation.score(&market, report.total);
            (report, score)
        };

        let whale = self.whale.report(trades, trade_start, now);
        let risk = self.composer.compose(
            Some(whale.ratio),
            Some(speculation.ratio),
            self.baseline.as_ref(),
        );

        tracing::info!(
            market_id = %market.id,
            mentions = mentions.total,
            speculation_ratio = speculation.ratio,
            whale_ratio = whale.ratio,
            risk = %risk,
            "Market scored"
        );

        MarketRiskReport {
            market_id: market.id.clone(),
            question: market.question.clone(),
            terms,
            mentions,
            speculation,
            whale,
            risk,
        }
    }

    /// Score a batch in order and rank the results
    pub async fn score_batch(&self, inputs: &[MarketInput], now: DateTime<Utc>) -> Vec<MarketRiskReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("score_batch", %run_id, markets = inputs.len());

        async {
            let mut reports = Vec::with_capacity(inputs.len());
            for input in inputs {
                reports.push(self.score_market(&input.market, &input.trades, now).await);
            }
            rank(&mut reports);
            tracing::info!(
                scored = reports.iter().filter(|r| r.risk.is_available()).count(),
                "Batch scored"
            );
            reports
        }
        .instrument(span)
        .await
    }

    /// Recompute risk scores against another baseline and re-rank
    ///
    /// Mention and trade results are reused; no requests are made.
    pub fn recompose(&self, reports: &mut [MarketRiskReport], baseline: Option<&Baseline>) {
        for report in reports.iter_mut() {
            report.risk = self.composer.compose(
                Some(report.whale.ratio),
                Some(report.speculation.ratio),
                baseline,
            );
        }
        rank(reports);
    }
}

/// Population averages derived from the ratios of already-scored markets
pub fn derive_baseline(reports: &[MarketRiskReport]) -> Option<Baseline> {
    let samples: Vec<(f64, f64)> = reports
        .iter()
        .map(|r| (r.speculation.ratio, r.whale.ratio))
        .collect();
    Baseline::from_samples(&samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityExtractor;
    use crate::mentions::{MentionProvider, ProviderError};
    use crate::risk::RiskScore;
    use crate::signal::ActivityBasis;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    struct Constant(u64);

    #[async_trait]
    impl MentionProvider for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        async fn count(
            &self,
            _source: &str,
            _terms: &[String],
            _window: &MentionWindow,
        ) -> Result<u64, ProviderError> {
            Ok(self.0)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.mentions.sources = vec!["soccer".to_string()];
        config
    }

    fn engine(mentions: u64) -> RiskEngine {
        let aggregator = MentionAggregator::new(Arc::new(Constant(mentions)), EntityExtractor::default());
        RiskEngine::new(aggregator, &config())
    }

    fn market(id: &str, question: &str, volume: f64) -> Market {
        Market {
            id: id.to_string(),
            question: question.to_string(),
            volume,
            volume_24hr: 0.0,
            liquidity: 0.0,
            trade_count: 0,
            start_date: now() - chrono::Duration::days(10),
        }
    }

    fn whale_trades() -> Vec<Trade> {
        let at = now() - chrono::Duration::days(1);
        vec![
            Trade::new(Some("w1"), dec!(10), at),
            Trade::new(Some("w1"), dec!(10), at),
            Trade::new(Some("w2"), dec!(1), at),
            Trade::new(Some("w3"), dec!(1), at),
            Trade::new(Some("w4"), dec!(1), at),
            Trade::new(Some("w5"), dec!(1), at),
        ]
    }

    #[tokio::test]
    async fn test_score_market_without_baseline() {
        let report = engine(9)
            .score_market(
                &market("1", "Manchester City vs Nottingham Forest", 1_000.0),
                &whale_trades(),
                now(),
            )
            .await;

        assert_eq!(report.terms, vec!["Manchester City", "Nottingham Forest"]);
        assert_eq!(report.mentions.total, 9);
        assert_eq!(report.speculation.ratio, 100.0);
        assert_eq!(report.whale.ratio, 20.0);
        assert_eq!(report.risk, RiskScore::Unavailable);
    }

    #[tokio::test]
    async fn test_score_market_at_baseline() {
        let engine = engine(9).with_baseline(Some(Baseline::new(100.0, 20.0)));
        let report = engine
            .score_market(
                &market("1", "Manchester City vs Nottingham Forest", 1_000.0),
                &whale_trades(),
                now(),
            )
            .await;
        assert_eq!(report.risk, RiskScore::Available(0.5));
    }

    #[tokio::test]
    async fn test_trade_counting_switches_basis() {
        let engine = engine(1).with_trade_counting(true);
        let report = engine
            .score_market(&market("1", "Will Arsenal win?", 1_000.0), &whale_trades(), now())
            .await;

        assert_eq!(report.speculation.basis, ActivityBasis::Trades);
        assert_eq!(report.speculation.ratio, 3.0);
    }

    #[tokio::test]
    async fn test_no_terms_is_zero_speculation() {
        let report = engine(50)
            .score_market(&market("1", "?? 2026-01-01", 1_000.0), &[], now())
            .await;
        assert!(report.terms.is_empty());
        assert_eq!(report.mentions.total, 0);
        assert_eq!(report.speculation.ratio, 0.0);
    }

    #[tokio::test]
    async fn test_batch_derive_and_recompose() {
        let engine = engine(0);
        let inputs = vec![
            MarketInput {
                market: market("b", "Will Chelsea win?", 300.0),
                trades: whale_trades(),
            },
            MarketInput {
                market: market("a", "Will Arsenal win?", 100.0),
                trades: Vec::new(),
            },
        ];

        let mut reports = engine.score_batch(&inputs, now()).await;
        assert!(reports.iter().all(|r| !r.risk.is_available()));
        assert_eq!(reports[0].market_id, "a");

        let baseline = derive_baseline(&reports).unwrap();
        assert_eq!(baseline.speculation_ratio, 200.0);
        assert_eq!(baseline.whale_ratio, 20.0);

        engine.recompose(&mut reports, Some(&baseline));
        assert!(reports.iter().all(|r| r.risk.is_available()));
        // Higher volume on "b" makes it the riskier market
        assert_eq!(reports[0].market_id, "b");
    }

    #[tokio::test]
    async fn test_oversized_trade_window_is_clamped() {
        let mut config = config();
        config.whale.window_days = i64::MAX;
        let aggregator = MentionAggregator::new(Arc::new(Constant(9)), EntityExtractor::default());
        let engine = RiskEngine::new(aggregator, &config);

        let report = engine
            .score_market(
                &market("1", "Manchester City vs Nottingham Forest", 1_000.0),
                &whale_trades(),
                now(),
            )
            .await;
        assert_eq!(report.whale.ratio, 20.0);
    }
}
