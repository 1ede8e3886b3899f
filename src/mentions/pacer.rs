//! Fixed minimum spacing between consecutive requests

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Spaces consecutive calls to [`Pacer::ready`] at least `interval` apart
pub struct Pacer {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer; a zero interval never waits
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Configured spacing
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may be sent, then claim the slot
    pub async fn ready(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let since = prev.elapsed();
            if since < self.interval {
                sleep(self.interval - since).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let pacer = Pacer::new(Duration::from_secs(60));
        let started = Instant::now();
        pacer.ready().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_consecutive_calls_are_spaced() {
        let pacer = Pacer::new(Duration::from_millis(40));
        let started = Instant::now();
        pacer.ready().await;
        pacer.ready().await;
        pacer.ready().await;
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
