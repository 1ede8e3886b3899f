//! Market and trade records
//!
//! Both are built from the JSON shapes of the listing and trade-history
//! APIs. Numbers may arrive as numbers or strings; missing numbers are zero.

mod listing;
mod trade;

pub use listing::{parse_start_date, ListingError};
pub use trade::Trade;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A prediction-market contract, immutable for a scoring pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Market {
    /// Listing identifier
    pub id: String,
    /// Question text
    pub question: String,
    /// Lifetime traded volume
    pub volume: f64,
    /// Traded volume over the last 24 hours
    pub volume_24hr: f64,
    /// Resting liquidity
    pub liquidity: f64,
    /// Trades over the trailing window; zero when unknown
    pub trade_count: u64,
    /// Market start
    pub start_date: DateTime<Utc>,
}

impl Market {
    /// Set the trailing-window trade count
    pub fn with_trade_count(mut self, trade_count: u64) -> Self {
        self.trade_count = trade_count;
        self
    }
}
