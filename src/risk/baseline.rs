//! Population-average ratios

use serde::{Deserialize, Serialize};

/// Average speculation and whale ratios over a market population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub speculation_ratio: f64,
    pub whale_ratio: f64,
}

impl Baseline {
    /// Create a baseline
    pub fn new(speculation_ratio: f64, whale_ratio: f64) -> Self {
        Self {
            speculation_ratio,
            whale_ratio,
        }
    }

    /// Average of the non-zero, finite ratios of a population
    ///
    /// Zero ratios mean "no signal" and would drag the average down, so they
    /// are left out. `None` when either side has no usable sample.
    pub fn from_samples(samples: &[(f64, f64)]) -> Option<Self> {
        let speculation = mean_of_signals(samples.iter().map(|s| s.0))?;
        let whale = mean_of_signals(samples.iter().map(|s| s.1))?;
        Some(Self::new(speculation, whale))
    }

    /// Both averages finite
    pub fn is_usable(&self) -> bool {
        self.speculation_ratio.is_finite() && self.whale_ratio.is_finite()
    }
}

fn mean_of_signals(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| v.is_finite() && *v != 0.0)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
