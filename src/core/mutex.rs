//! The cross-process mutex handle and its acquisition protocol.

use crate::constants;
use crate::core::error::LockError;
use crate::core::flock::{self, Attempt, LockHandle};
use crate::core::metadata::{self, OwnerStamp};
use crate::core::options::LockOptions;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

/// A mutual-exclusion handle bound to one protected target path.
///
/// Exclusion is coordinated through a companion lock file
/// (`<target>.lock`): whoever holds the OS-level exclusive advisory lock on
/// that file owns the mutex. The lock file's existence and content are
/// diagnostic only; an orphaned file left behind by an unclean shutdown does
/// not block the next waiter.
///
/// Each process builds its own handle; instances are not shared across
/// processes. Acquisition is a synchronous polling loop with a fixed pause
/// between attempts, and no fairness is guaranteed among waiters: which of
/// several blocked processes wins after a release is up to the OS scheduler.
///
/// The lock is released when the handle is dropped, so a locked mutex never
/// outlives its scope.
#[derive(Debug)]
pub struct FileMutex {
    target: PathBuf,
    artifact: PathBuf,
    owner_pid: u32,
    options: LockOptions,
    handle: Option<LockHandle>,
}

impl FileMutex {
    /// Bind a mutex to an existing target path with default options.
    pub fn new(target: impl Into<PathBuf>) -> Result<Self, LockError> {
        Self::with_options(target, LockOptions::default())
    }

    /// Bind a mutex to an existing target path with validated options.
    ///
    /// No lock file is created here; that happens on the first `lock()` or
    /// `try_lock()`.
    pub fn with_options(
        target: impl Into<PathBuf>,
        options: LockOptions,
    ) -> Result<Self, LockError> {
        let target = target.into();
        if target.as_os_str().is_empty() {
            return Err(LockError::InvalidInput {
                reason: "target path is empty".to_string(),
            });
        }
        if !target.exists() {
            return Err(LockError::ResourceNotFound { path: target });
        }
        options.validate()?;
        let artifact = artifact_path(&target);
        Ok(Self {
            target,
            artifact,
            owner_pid: std::process::id(),
            options,
            handle: None,
        })
    }

    /// The protected target path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The companion lock file path (`<target>.lock`).
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Whether this handle currently owns the lock.
    pub fn is_locked(&self) -> bool {
        self.handle.is_some()
    }

    /// Block until the exclusive lock is acquired, the deadline elapses, or
    /// the unexpected-failure budget is spent.
    ///
    /// A lock held elsewhere is not an error: the loop sleeps `pause` and
    /// tries again, giving up with [`LockError::TimeoutExceeded`] only once
    /// `max_wait` (when non-zero) has elapsed. Failures other than contention
    /// (an unreadable lock file, say) are retried up to `retry_max` times
    /// within this call and then escalate to [`LockError::MaxRetriesExceeded`]
    /// carrying the last underlying error.
    ///
    /// Calling `lock()` on a handle that already owns the lock warns and
    /// returns `Ok(())` without touching the held lock. On every error return
    /// the handle owns nothing and no one else's lock file has been disturbed.
    pub fn lock(&mut self) -> Result<(), LockError> {
        if self.is_locked() {
            eprintln!(
                "warning: {} already locked by this handle (pid {})",
                self.artifact.display(),
                self.owner_pid
            );
            return Ok(());
        }

        let started = Instant::now();
        let mut unexpected: u32 = 0;
        loop {
            match flock::try_exclusive(&self.artifact) {
                Ok(Attempt::Acquired(handle)) => {
                    self.adopt(handle);
                    return Ok(());
                }
                Ok(Attempt::Contended) => {
                    // the attempt's file handle is already closed; the lock
                    // file stays, it belongs to the current holder
                    if !self.options.max_wait.is_zero()
                        && started.elapsed() >= self.options.max_wait
                    {
                        return Err(LockError::TimeoutExceeded {
                            path: self.artifact.clone(),
                            waited: started.elapsed(),
                        });
                    }
                }
                Err(e) => {
                    unexpected += 1;
                    if unexpected > self.options.retry_max {
                        return Err(LockError::MaxRetriesExceeded {
                            path: self.artifact.clone(),
                            attempts: unexpected,
                            source: e,
                        });
                    }
                    eprintln!(
                        "warning: lock attempt on {} failed (retry {}/{}, pid {}): {}",
                        self.artifact.display(),
                        unexpected,
                        self.options.retry_max,
                        self.owner_pid,
                        e
                    );
                }
            }
            thread::sleep(self.options.pause);
        }
    }

    /// One non-blocking attempt. Returns `Ok(true)` if the lock was acquired
    /// (or was already held by this handle), `Ok(false)` on contention.
    pub fn try_lock(&mut self) -> Result<bool, LockError> {
        if self.is_locked() {
            eprintln!(
                "warning: {} already locked by this handle (pid {})",
                self.artifact.display(),
                self.owner_pid
            );
            return Ok(true);
        }
        match flock::try_exclusive(&self.artifact) {
            Ok(Attempt::Acquired(handle)) => {
                self.adopt(handle);
                Ok(true)
            }
            Ok(Attempt::Contended) => Ok(false),
            Err(source) => Err(LockError::AttemptFailed {
                path: self.artifact.clone(),
                source,
            }),
        }
    }

    /// Release a held lock and delete the lock file.
    ///
    /// Unlocking a handle that owns nothing is a warning-level no-op. If any
    /// release step fails the handle is force-closed anyway and the mutex
    /// reports itself unlocked, but the lock file may remain on disk; the next
    /// waiter can still acquire it (an advisory lock on an existing file
    /// succeeds), so the leftover is cosmetic rather than wedging.
    pub fn unlock(&mut self) -> Result<(), LockError> {
        let Some(handle) = self.handle.take() else {
            eprintln!(
                "warning: {} is not locked by this handle (pid {})",
                self.artifact.display(),
                self.owner_pid
            );
            return Ok(());
        };

        // Delete while still holding the lock: only the holder may remove the
        // lock file, and releasing first would let a new holder acquire a file
        // we are about to unlink.
        let removed = std::fs::remove_file(&self.artifact);
        let released = handle.release();
        match (removed, released) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(source), _) | (_, Err(source)) => Err(LockError::UnlockFailed {
                path: self.artifact.clone(),
                source,
            }),
        }
    }

    fn adopt(&mut self, mut handle: LockHandle) {
        let stamp = OwnerStamp::now(self.owner_pid);
        if let Err(e) = metadata::write_stamp(handle.file_mut(), &stamp) {
            // the stamp is diagnostic only; a failed write does not
            // invalidate the acquired lock
            eprintln!(
                "warning: cannot stamp {}: {:#}",
                self.artifact.display(),
                e
            );
        }
        self.handle = Some(handle);
    }
}

impl Drop for FileMutex {
    fn drop(&mut self) {
        if self.is_locked() {
            if let Err(e) = self.unlock() {
                // drop must not propagate failures
                eprintln!(
                    "warning: implicit unlock of {} failed: {}",
                    self.artifact.display(),
                    e
                );
            }
        }
    }
}

fn artifact_path(target: &Path) -> PathBuf {
    let mut raw = target.as_os_str().to_os_string();
    raw.push(constants::LOCK_SUFFIX);
    PathBuf::from(raw)
}
