//! Trading activity relative to public discussion

use crate::market::Market;
use serde::Serialize;

/// Which activity measure fed a speculation ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityBasis {
    /// Trailing-window trade count
    Trades,
    /// Listing volume, used when no trade count is known
    Volume,
}

/// Speculation ratio together with its inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeculationScore {
    pub ratio: f64,
    pub activity: f64,
    pub basis: ActivityBasis,
    pub mentions: u64,
}

/// `activity / (mentions + 1)`; 0 when activity is not a positive number
pub fn speculation_ratio(activity: f64, mentions: u64) -> f64 {
    if !activity.is_finite() || activity <= 0.0 {
        return 0.0;
    }
    activity / (mentions as f64 + 1.0)
}

/// Builds speculation scores for markets
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeculationScorer;

impl SpeculationScorer {
    /// Trade count when positive, otherwise volume
    pub fn activity(market: &Market) -> (f64, ActivityBasis) {
        if market.trade_count > 0 {
            (market.trade_count as f64, ActivityBasis::Trades)
        } else {
            (market.volume, ActivityBasis::Volume)
        }
    }

    /// Score a market against its mention count
    pub fn score(&self, market: &Market, mentions: u64) -> SpeculationScore {
        let (activity, basis) = Self::activity(market);
        SpeculationScore {
            ratio: speculation_ratio(activity, mentions),
            activity,
            basis,
            mentions,
        }
    }

    /// Zero score for a market whose question yielded no search terms
    pub fn no_signal(&self, market: &Market) -> SpeculationScore {
        let (activity, basis) = Self::activity(market);
        SpeculationScore {
            ratio: 0.0,
            activity,
            basis,
            mentions: 0,
        }
    }
}
