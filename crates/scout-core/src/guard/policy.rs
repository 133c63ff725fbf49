//! Retry policy for tool initialization

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the guard retries after failed connection attempts.
///
/// After the k-th consecutive failure a new attempt may start once
/// [`InitPolicy::backoff_after`]`(k)` has elapsed. After `max_attempts`
/// consecutive failures no further attempt starts until the guard is reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitPolicy {
    /// Consecutive failures tolerated before giving up (`None` = never give up)
    pub max_attempts: Option<u32>,
    /// Delay after the first failure
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    /// Upper bound for the delay
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    /// Growth factor per consecutive failure
    pub multiplier: f64,
}

impl Default for InitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl InitPolicy {
    /// Retry at once after every failure, forever
    pub fn immediate() -> Self {
        Self {
            max_attempts: None,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Set the attempt limit
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the initial and maximum backoff
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Delay required after `failures` consecutive failures
    pub fn backoff_after(&self, failures: u32) -> Duration {
        if failures == 0 || self.initial_backoff.is_zero() {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(failures - 1).unwrap_or(i32::MAX);
        let base = self.initial_backoff.as_secs_f64() * self.multiplier.max(1.0).powi(exponent);
        let capped = base.min(self.max_backoff.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_backoff)
    }

    /// Whether another attempt is allowed after `failures` consecutive failures
    pub fn allows_attempt(&self, failures: u32) -> bool {
        self.max_attempts.is_none_or(|max| failures < max)
    }
}
