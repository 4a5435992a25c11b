//! Thin wrapper over the OS advisory exclusive-lock primitive (flock(2) via fs2).
//!
//! Contention is a normal outcome here, not an error: callers get
//! [`Attempt::Contended`] when another handle holds the lock and decide for
//! themselves whether to retry, give up, or report.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Outcome of one non-blocking acquisition attempt.
#[derive(Debug)]
pub enum Attempt {
    /// The exclusive lock was granted; the handle keeps it alive.
    Acquired(LockHandle),
    /// Another handle (possibly in another process) holds the lock.
    Contended,
}

/// An open lock file carrying a live exclusive advisory lock.
///
/// Closing the file releases the lock, so dropping the handle is always a
/// safe release path.
#[derive(Debug)]
pub struct LockHandle {
    file: File,
}

impl LockHandle {
    /// The open lock file, for writing diagnostic content while locked.
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Explicitly release the lock. The file is closed either way.
    pub fn release(self) -> io::Result<()> {
        self.file.unlock()
    }
}

/// Open or create the lock file and try a non-blocking exclusive lock.
pub fn try_exclusive(path: &Path) -> io::Result<Attempt> {
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(Attempt::Acquired(LockHandle { file })),
        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Attempt::Contended),
        // fs2 on Linux may return Other instead of WouldBlock
        Err(ref e) if e.raw_os_error() == Some(11) => Ok(Attempt::Contended), // EAGAIN
        Err(e) => Err(e),
    }
}

/// Probe an existing lock file without creating or deleting anything.
///
/// Returns `Ok(true)` if the lock is currently held elsewhere, `Ok(false)` if
/// it was free (the probe lock is taken and dropped again, leaving the file in
/// place). A missing file surfaces as `ErrorKind::NotFound`.
pub fn probe(path: &Path) -> io::Result<bool> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    match file.try_lock_exclusive() {
        Ok(()) => {
            file.unlock()?;
            Ok(false)
        }
        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(true),
        Err(ref e) if e.raw_os_error() == Some(11) => Ok(true),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_then_contended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        let first = try_exclusive(&path).unwrap();
        assert!(matches!(first, Attempt::Acquired(_)));
        let second = try_exclusive(&path).unwrap();
        assert!(matches!(second, Attempt::Contended));
    }

    #[test]
    fn test_release_allows_reacquire() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        match try_exclusive(&path).unwrap() {
            Attempt::Acquired(handle) => handle.release().unwrap(),
            Attempt::Contended => panic!("fresh lock file reported contended"),
        }
        assert!(matches!(
            try_exclusive(&path).unwrap(),
            Attempt::Acquired(_)
        ));
    }

    #[test]
    fn test_drop_releases() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        {
            let _held = try_exclusive(&path).unwrap();
        }
        assert!(matches!(
            try_exclusive(&path).unwrap(),
            Attempt::Acquired(_)
        ));
    }

    #[test]
    fn test_probe_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = probe(&dir.path().join("absent.lock")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dir.path().join("absent.lock").exists());
    }

    #[test]
    fn test_probe_reports_held_and_free() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        let held = try_exclusive(&path).unwrap();
        assert!(probe(&path).unwrap());
        drop(held);
        assert!(!probe(&path).unwrap());
        // probing a free lock leaves the file in place
        assert!(path.exists());
    }
}
