//! Telemetry module
//!
//! Structured logging and request metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{
    record_provider_failure, record_provider_request, record_risk_unavailable,
    record_sources_skipped, RequestOutcome,
};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)
}
