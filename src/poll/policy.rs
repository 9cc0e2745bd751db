//! Retry budget for the consistency poller

use crate::types::InterruptPolicy;
use std::time::Duration;

/// Default number of search attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 7;

/// Default pause between attempts
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Bounded retry settings for one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of search calls, never less than one
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub interval: Duration,
    /// Reaction to an interrupted pause
    pub on_interrupt: InterruptPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            on_interrupt: InterruptPolicy::Continue,
        }
    }
}

impl RetryPolicy {
    /// Create a policy; a zero attempt budget is raised to one
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
            on_interrupt: InterruptPolicy::Continue,
        }
    }

    /// Set the interrupt policy
    #[must_use]
    pub fn on_interrupt(mut self, policy: InterruptPolicy) -> Self {
        self.on_interrupt = policy;
        self
    }

    /// Upper bound on time spent pausing when every attempt misses
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.max(1).saturating_sub(1)
    }
}
