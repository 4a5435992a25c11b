//! Centralized constants for lock file naming and retry defaults.

use std::time::Duration;

/// Suffix appended to the target path to derive the lock artifact path.
pub const LOCK_SUFFIX: &str = ".lock";

/// Default budget of consecutive unexpected (non-contention) failures
/// tolerated within a single `lock()` call.
pub const DEFAULT_RETRY_MAX: u32 = 20;

/// Default pause between lock attempts.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Default maximum wait for `lock()`. Zero means wait forever.
pub const DEFAULT_MAX_WAIT: Duration = Duration::ZERO;
