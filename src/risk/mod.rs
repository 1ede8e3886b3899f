//! Composite risk scoring
//!
//! Maps whale and speculation ratios onto `(0, 1)` against population
//! averages and averages the two components. Low scores mean high risk.

mod baseline;
mod composer;
mod types;

pub use baseline::Baseline;
pub use composer::{compose_risk, logistic, RiskComposer};
pub use types::{RiskScore, UnavailableReason};

/// Logistic steepness used when none is configured
pub const DEFAULT_STEEPNESS: f64 = 1.0;
