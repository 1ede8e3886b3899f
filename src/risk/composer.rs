//! Logistic normalization of ratios against a baseline

use super::{Baseline, RiskScore, UnavailableReason, DEFAULT_STEEPNESS};
use crate::config::RiskConfig;
use crate::telemetry;

/// `1 / (1 + e^(−k·(x − x0)))`
pub fn logistic(x: f64, x0: f64, k: f64) -> f64 {
    1.0 / (1.0 + (-k * (x - x0)).exp())
}

/// Combines whale and speculation ratios into one score
#[derive(Debug, Clone, Copy)]
pub struct RiskComposer {
    steepness: f64,
}

impl Default for RiskComposer {
    fn default() -> Self {
        Self::new(DEFAULT_STEEPNESS)
    }
}

impl RiskComposer {
    /// Create a composer; a non-positive or non-finite `k` falls back to the default
    pub fn new(steepness: f64) -> Self {
        let steepness = if steepness.is_finite() && steepness > 0.0 {
            steepness
        } else {
            DEFAULT_STEEPNESS
        };
        Self { steepness }
    }

    /// Composer from configuration
    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.steepness)
    }

    /// Logistic steepness in use
    pub fn steepness(&self) -> f64 {
        self.steepness
    }

    /// `1 − (whale_component + speculation_component) / 2`
    ///
    /// Ratios above their averages push the score toward 0. A ratio of 0 is
    /// the scorers' "no signal" value and enters the logistic as-is, so a
    /// market with too few actors or no activity lands on the safe side.
    pub fn compose(
        &self,
        whale_ratio: Option<f64>,
        speculation_ratio: Option<f64>,
        baseline: Option<&Baseline>,
    ) -> RiskScore {
        match self.evaluate(whale_ratio, speculation_ratio, baseline) {
            Ok(score) => RiskScore::Available(score),
            Err(reason) => {
                tracing::debug!(reason = reason.as_str(), "Risk score unavailable");
                telemetry::record_risk_unavailable(reason.as_str());
                RiskScore::Unavailable
            }
        }
    }

    fn evaluate(
        &self,
        whale_ratio: Option<f64>,
        speculation_ratio: Option<f64>,
        baseline: Option<&Baseline>,
    ) -> Result<f64, UnavailableReason> {
        let baseline = baseline.ok_or(UnavailableReason::BaselineMissing)?;
        let whale = whale_ratio.ok_or(UnavailableReason::RatioMissing)?;
        let speculation = speculation_ratio.ok_or(UnavailableReason::RatioMissing)?;

        if !baseline.is_usable() || !whale.is_finite() || !speculation.is_finite() {
            return Err(UnavailableReason::NonFinite);
        }

        if whale == 0.0 || speculation == 0.0 {
            tracing::debug!(whale, speculation, "No-signal ratio composed as zero");
        }

        let whale_component = logistic(whale, baseline.whale_ratio, self.steepness);
        let speculation_component =
            logistic(speculation, baseline.speculation_ratio, self.steepness);
        let score = 1.0 - (whale_component + speculation_component) / 2.0;

        if score.is_finite() {
            Ok(score.clamp(0.0, 1.0))
        } else {
            Err(UnavailableReason::NonFinite)
        }
    }
}

/// Compose with the default steepness
pub fn compose_risk(
    whale_ratio: Option<f64>,
    speculation_ratio: Option<f64>,
    baseline: Option<&Baseline>,
) -> RiskScore {
    RiskComposer::default().compose(whale_ratio, speculation_ratio, baseline)
}
