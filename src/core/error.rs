//! Error taxonomy for lock construction, acquisition, and release.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal outcomes of mutex operations.
///
/// Contention is never represented here: a lock held elsewhere is an expected
/// condition handled by retrying, and only surfaces as [`LockError::TimeoutExceeded`]
/// once the caller's deadline elapses. Benign misuse (re-locking a held mutex,
/// unlocking an idle one) is a warning-level no-op, not an error.
#[derive(Debug, Error)]
pub enum LockError {
    /// The target path was unusable (empty or otherwise not a real path).
    #[error("invalid target path: {reason}")]
    InvalidInput { reason: String },

    /// The target path does not exist; the mutex protects an existing resource.
    #[error("target does not exist: {path}")]
    ResourceNotFound { path: PathBuf },

    /// A configuration value was outside its allowed domain.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// The deadline elapsed while the lock was held elsewhere.
    #[error("timed out after {waited:?} waiting for lock on {path}")]
    TimeoutExceeded { path: PathBuf, waited: Duration },

    /// Persistent unexpected failures (not contention) exhausted the retry budget.
    #[error("gave up on lock {path} after {attempts} unexpected failures")]
    MaxRetriesExceeded {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    /// A single non-blocking attempt failed for a reason other than contention.
    #[error("lock attempt on {path} failed")]
    AttemptFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Releasing the lock failed. The handle is force-closed regardless and the
    /// mutex reports itself unlocked, but the lock artifact may remain on disk.
    #[error("failed to release lock on {path}")]
    UnlockFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
