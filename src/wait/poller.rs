use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use super::{PollConfigError, WaitError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Time budget and probe spacing for a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    timeout: Duration,
    interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Result<Self, PollConfigError> {
        if interval.is_zero() {
            return Err(PollConfigError::ZeroInterval);
        }
        Ok(Self { timeout, interval })
    }

    pub fn from_millis(timeout_ms: u64, interval_ms: u64) -> Result<Self, PollConfigError> {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(interval_ms),
        )
    }

    /// Single probe, no retries. For conditions expected to hold already.
    pub fn no_wait() -> Self {
        Self {
            timeout: Duration::ZERO,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Evaluate `condition` until it yields a value or `config.timeout()` elapses.
///
/// The condition returns `Ok(Some(v))` when satisfied and `Ok(None)` while the
/// thing it looks for is not there yet. An `Err` aborts the wait at once and is
/// returned as [`WaitError::Condition`]. With a zero timeout exactly one probe
/// runs. Between probes the calling task sleeps on the tokio timer, never for
/// longer than the time left in the budget.
pub async fn wait_for<T, F, Fut>(
    description: &str,
    config: PollConfig,
    mut condition: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<Option<T>>>,
{
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if let Some(value) = condition().await? {
            tracing::debug!(
                attempts,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Condition satisfied: {}",
                description
            );
            return Ok(value);
        }

        let elapsed = start.elapsed();
        if elapsed >= config.timeout {
            tracing::debug!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Gave up waiting for {}",
                description
            );
            return Err(WaitError::Timeout {
                description: description.to_string(),
                elapsed,
                attempts,
            });
        }

        let remaining = config.timeout - elapsed;
        tokio::time::sleep(config.interval.min(remaining)).await;
    }
}
