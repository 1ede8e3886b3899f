//! Metrics emitted through the `metrics` facade
//!
//! No exporter is installed here; whoever embeds the engine decides where
//! the counters go. Without a recorder every call is a no-op.

use std::time::Duration;

/// Result of one upstream request, as seen by a mention provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// 2xx
    Ok,
    /// Transport failure or non-success status
    Failed,
    /// HTTP 429
    RateLimited,
}

impl RequestOutcome {
    /// Label value
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Ok => "ok",
            RequestOutcome::Failed => "failed",
            RequestOutcome::RateLimited => "rate_limited",
        }
    }
}

/// Count a provider request and record its latency
pub fn record_provider_request(provider: &'static str, outcome: RequestOutcome, elapsed: Duration) {
    ::metrics::counter!(
        "polyrisk_provider_requests_total",
        "provider" => provider,
        "outcome" => outcome.as_str()
    )
    .increment(1);
    ::metrics::histogram!("polyrisk_provider_latency_seconds", "provider" => provider)
        .record(elapsed.as_secs_f64());
}

/// Count a provider call that was absorbed as zero
pub fn record_provider_failure(provider: &'static str, kind: &'static str) {
    ::metrics::counter!(
        "polyrisk_provider_failures_total",
        "provider" => provider,
        "kind" => kind
    )
    .increment(1);
}

/// Count sources left unqueried because the time budget ran out
pub fn record_sources_skipped(count: usize) {
    if count > 0 {
        ::metrics::counter!("polyrisk_sources_skipped_total").increment(count as u64);
    }
}

/// Count a market whose risk score could not be computed
pub fn record_risk_unavailable(reason: &'static str) {
    ::metrics::counter!("polyrisk_risk_unavailable_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(RequestOutcome::Ok.as_str(), "ok");
        assert_eq!(RequestOutcome::RateLimited.as_str(), "rate_limited");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_provider_request("search", RequestOutcome::Failed, Duration::from_millis(5));
        record_provider_failure("buckets", "exhausted");
        record_sources_skipped(0);
        record_sources_skipped(2);
        record_risk_unavailable("baseline_missing");
    }
}
