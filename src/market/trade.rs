//! Trade-history parsing

use crate::json::{i64_lenient, string_lenient};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// One fill from the trade history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    /// Wallet that traded; trades without one are ignored by scoring
    pub actor: Option<String>,
    /// Signed size; scoring uses the magnitude
    pub size: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// Create a trade
    pub fn new(actor: Option<&str>, size: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            actor: actor.map(str::trim).filter(|a| !a.is_empty()).map(str::to_string),
            size,
            timestamp,
        }
    }

    /// Build a trade from a history entry
    ///
    /// `None` when the timestamp is missing or out of range, since such a
    /// trade cannot be placed in any window. A missing size is zero.
    pub fn from_value(value: &Value) -> Option<Trade> {
        let seconds = value.get("timestamp").and_then(i64_lenient)?;
        let timestamp = DateTime::<Utc>::from_timestamp(seconds, 0)?;
        let actor = value.get("proxyWallet").and_then(string_lenient);
        let size = value.get("size").and_then(decimal_lenient).unwrap_or_default();

        Some(Trade::new(actor.as_deref(), size, timestamp))
    }

    /// Size magnitude
    pub fn magnitude(&self) -> Decimal {
        self.size.abs()
    }
}

fn decimal_lenient(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
