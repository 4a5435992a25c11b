//! Retry and deadline configuration for lock acquisition.

use crate::constants;
use crate::core::error::LockError;
use std::time::Duration;

/// Tuning knobs for the acquisition loop, validated before use.
///
/// The pause between attempts is a fixed interval, not exponential backoff:
/// waiters poll at a steady rate, so acquisition latency after a release is
/// bounded by one pause interval at the cost of some wakeup churn.
#[derive(Debug, Clone)]
pub struct LockOptions {
    /// Consecutive unexpected (non-contention) failures tolerated within a
    /// single `lock()` call before giving up.
    pub retry_max: u32,
    /// Fixed sleep between attempts. Must be greater than zero.
    pub pause: Duration,
    /// Wall-clock deadline for `lock()`. Zero means wait forever.
    pub max_wait: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            retry_max: constants::DEFAULT_RETRY_MAX,
            pause: constants::DEFAULT_PAUSE,
            max_wait: constants::DEFAULT_MAX_WAIT,
        }
    }
}

impl LockOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unexpected-failure retry budget.
    #[must_use]
    pub fn with_retry_max(mut self, retry_max: u32) -> Self {
        self.retry_max = retry_max;
        self
    }

    /// Set the pause between attempts.
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Set the acquisition deadline. Zero disables it.
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Set the pause from seconds, rejecting zero, negative, and non-finite
    /// values.
    pub fn with_pause_secs(self, secs: f64) -> Result<Self, LockError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(LockError::InvalidOption {
                name: "pause",
                reason: format!("must be a positive number of seconds, got {secs}"),
            });
        }
        Ok(self.with_pause(Duration::from_secs_f64(secs)))
    }

    /// Set the deadline from seconds, rejecting negative and non-finite
    /// values. Zero disables the deadline.
    pub fn with_max_wait_secs(self, secs: f64) -> Result<Self, LockError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(LockError::InvalidOption {
                name: "max_wait",
                reason: format!("must be a non-negative number of seconds, got {secs}"),
            });
        }
        Ok(self.with_max_wait(Duration::from_secs_f64(secs)))
    }

    /// Check that every field is inside its allowed domain.
    pub fn validate(&self) -> Result<(), LockError> {
        if self.pause.is_zero() {
            return Err(LockError::InvalidOption {
                name: "pause",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = LockOptions::default();
        assert_eq!(opts.retry_max, constants::DEFAULT_RETRY_MAX);
        assert_eq!(opts.pause, Duration::from_millis(100));
        assert!(opts.max_wait.is_zero());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let opts = LockOptions::new()
            .with_retry_max(3)
            .with_pause(Duration::from_millis(5))
            .with_max_wait(Duration::from_secs(2));
        assert_eq!(opts.retry_max, 3);
        assert_eq!(opts.pause, Duration::from_millis(5));
        assert_eq!(opts.max_wait, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_pause_rejected() {
        let opts = LockOptions::new().with_pause(Duration::ZERO);
        assert!(matches!(
            opts.validate(),
            Err(LockError::InvalidOption { name: "pause", .. })
        ));
    }

    #[test]
    fn test_pause_secs_domain() {
        assert!(LockOptions::new().with_pause_secs(0.05).is_ok());
        assert!(LockOptions::new().with_pause_secs(0.0).is_err());
        assert!(LockOptions::new().with_pause_secs(-1.0).is_err());
        assert!(LockOptions::new().with_pause_secs(f64::NAN).is_err());
        assert!(LockOptions::new().with_pause_secs(f64::INFINITY).is_err());
    }

    #[test]
    fn test_max_wait_secs_domain() {
        assert!(LockOptions::new().with_max_wait_secs(0.0).is_ok());
        assert!(LockOptions::new().with_max_wait_secs(5.0).is_ok());
        assert!(LockOptions::new().with_max_wait_secs(-0.1).is_err());
        assert!(LockOptions::new().with_max_wait_secs(f64::NAN).is_err());
    }
}
