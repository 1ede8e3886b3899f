//! Risk score types

use serde::{Serialize, Serializer};
use std::fmt;

/// Why a risk score could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No population averages configured
    BaselineMissing,
    /// A ratio was absent
    RatioMissing,
    /// An input was NaN or infinite
    NonFinite,
}

impl UnavailableReason {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::BaselineMissing => "baseline_missing",
            UnavailableReason::RatioMissing => "ratio_missing",
            UnavailableReason::NonFinite => "non_finite",
        }
    }
}

/// Composite score in `[0, 1]`, or unavailable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskScore {
    Available(f64),
    Unavailable,
}

impl RiskScore {
    /// Score value, if available
    pub fn value(&self) -> Option<f64> {
        match self {
            RiskScore::Available(v) => Some(*v),
            RiskScore::Unavailable => None,
        }
    }

    /// Whether a value is present
    pub fn is_available(&self) -> bool {
        matches!(self, RiskScore::Available(_))
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskScore::Available(v) => write!(f, "{:.3}", v),
            RiskScore::Unavailable => write!(f, "—"),
        }
    }
}

/// Serialized as a number or `null`
impl Serialize for RiskScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}
