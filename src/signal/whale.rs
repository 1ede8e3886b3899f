//! Wallet-concentration scoring

use super::stats::{median, percentile};
use crate::config::WhaleConfig;
use crate::market::Trade;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Cumulative absolute traded size per actor, scoped to one scoring call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletTotals {
    totals: HashMap<String, Decimal>,
}

impl WalletTotals {
    /// Sum |size| per actor for trades with `start <= timestamp <= end`
    ///
    /// Trades without an actor are skipped. A total that would overflow
    /// `Decimal` saturates at `Decimal::MAX`.
    pub fn collect<'a>(
        trades: impl IntoIterator<Item = &'a Trade>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for trade in trades {
            if trade.timestamp < start || trade.timestamp > end {
                continue;
            }
            let Some(actor) = trade.actor.as_deref() else {
                continue;
            };
            let total = totals.entry(actor.to_string()).or_default();
            *total = match total.checked_add(trade.magnitude()) {
                Some(sum) => sum,
                None => {
                    tracing::warn!(actor, "Wallet total overflowed, saturating");
                    Decimal::MAX
                }
            };
        }
        Self { totals }
    }

    /// Distinct actors
    pub fn actor_count(&self) -> usize {
        self.totals.len()
    }

    /// Totals in ascending order
    pub fn sorted(&self) -> Vec<Decimal> {
        let mut values: Vec<Decimal> = self.totals.values().copied().collect();
        values.sort();
        values
    }

    /// Actor with the largest total; ties go to the smallest actor id
    pub fn largest(&self) -> Option<(&str, Decimal)> {
        self.totals
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(actor, total)| (actor.as_str(), *total))
    }
}

/// Concentration statistics behind a whale ratio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhaleReport {
    /// Upper percentile over median; 0 when there is no signal
    pub ratio: f64,
    pub actor_count: usize,
    pub median: Decimal,
    /// Upper-percentile total (p95 by default)
    pub upper: Decimal,
    pub largest_actor: Option<String>,
}

impl WhaleReport {
    fn no_signal(actor_count: usize) -> Self {
        Self {
            ratio: 0.0,
            actor_count,
            median: Decimal::ZERO,
            upper: Decimal::ZERO,
            largest_actor: None,
        }
    }
}

/// Compares an upper percentile of per-actor volume to the median actor
#[derive(Debug, Clone)]
pub struct WhaleScorer {
    min_actors: usize,
    percentile: f64,
}

impl Default for WhaleScorer {
    fn default() -> Self {
        Self::from_config(&WhaleConfig::default())
    }
}

impl WhaleScorer {
    /// Create a scorer
    pub fn new(min_actors: usize, percentile: f64) -> Self {
        Self {
            min_actors: min_actors.max(1),
            percentile,
        }
    }

    /// Scorer from configuration
    pub fn from_config(config: &WhaleConfig) -> Self {
        Self::new(config.min_actors, config.percentile)
    }

    /// Whale ratio for trades in `[start, end]`; 0 means no signal
    pub fn score(&self, trades: &[Trade], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        self.report(trades, start, end).ratio
    }

    /// Whale ratio together with the statistics behind it
    pub fn report(&self, trades: &[Trade], start: DateTime<Utc>, end: DateTime<Utc>) -> WhaleReport {
        let totals = WalletTotals::collect(trades, start, end);
        let actor_count = totals.actor_count();

        if actor_count < self.min_actors {
            tracing::debug!(
                actor_count,
                min_actors = self.min_actors,
                "Too few actors for a whale ratio"
            );
            return WhaleReport::no_signal(actor_count);
        }

        let sorted = totals.sorted();
        let (Some(mid), Some(upper)) = (median(&sorted), percentile(&sorted, self.percentile))
        else {
            return WhaleReport::no_signal(actor_count);
        };

        let ratio = if mid.is_zero() {
            0.0
        } else {
            upper
                .checked_div(mid)
                .and_then(|r| r.to_f64())
                .unwrap_or(0.0)
        };

        WhaleReport {
            ratio,
            actor_count,
            median: mid,
            upper,
            largest_actor: totals.largest().map(|(actor, _)| actor.to_string()),
        }
    }
}

/// Whale ratio with the default gate (5 actors) and percentile (95)
pub fn whale_score(trades: &[Trade], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    WhaleScorer::default().score(trades, start, end)
}

/// Trades with `start <= timestamp <= end`, with or without an actor
pub fn trades_in_window(trades: &[Trade], start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    trades
        .iter()
        .filter(|t| t.timestamp >= start && t.timestamp <= end)
        .count() as u64
}
