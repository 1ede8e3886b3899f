//! Market signals
//!
//! Wallet concentration ("whale") and speculation-to-discussion ratios.
//! Zero always means "no signal", never an error.

mod speculation;
mod stats;
mod whale;

pub use speculation::{speculation_ratio, ActivityBasis, SpeculationScore, SpeculationScorer};
pub use stats::{median, percentile};
pub use whale::{trades_in_window, whale_score, WalletTotals, WhaleReport, WhaleScorer};
