//! Market listing parsing

use super::Market;
use crate::json::{f64_lenient, string_lenient};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// A listing entry that cannot become a [`Market`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing is missing {0}")]
    Missing(&'static str),
    #[error("unparseable startDate: {0}")]
    StartDate(String),
}

impl Market {
    /// Build a market from a listing entry
    ///
    /// `id`, `question` and `startDate` are required. `volume`, `volume24hr`
    /// and `liquidity` default to zero; negative values clamp to zero.
    pub fn from_listing(value: &Value) -> Result<Market, ListingError> {
        let id = value
            .get("id")
            .and_then(string_lenient)
            .ok_or(ListingError::Missing("id"))?;
        let question = value
            .get("question")
            .and_then(string_lenient)
            .ok_or(ListingError::Missing("question"))?;
        let raw_start = value
            .get("startDate")
            .and_then(string_lenient)
            .ok_or(ListingError::Missing("startDate"))?;
        let start_date =
            parse_start_date(&raw_start).ok_or(ListingError::StartDate(raw_start))?;

        let number = |key: &str| value.get(key).and_then(f64_lenient).unwrap_or(0.0).max(0.0);

        Ok(Market {
            id,
            question,
            volume: number("volume"),
            volume_24hr: number("volume24hr"),
            liquidity: number("liquidity"),
            trade_count: 0,
            start_date,
        })
    }
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC), or a bare date at midnight UTC
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
