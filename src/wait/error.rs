use std::time::Duration;

/// Failure of a bounded wait.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// No probe satisfied the condition within the budget.
    #[error(
        "Timed out after {}ms waiting for {description} ({attempts} probes)",
        elapsed.as_millis()
    )]
    Timeout {
        description: String,
        elapsed: Duration,
        attempts: u32,
    },
    /// The condition itself failed. Never retried.
    #[error(transparent)]
    Condition(#[from] anyhow::Error),
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Elapsed wait for a timeout, `None` for a condition failure.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Timeout { elapsed, .. } => Some(*elapsed),
            Self::Condition(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollConfigError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}
