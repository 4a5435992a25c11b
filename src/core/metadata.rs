//! Diagnostic owner stamp written into the lock artifact.
//!
//! The stamp records who last held the lock and when, for operators poking at
//! a stuck system. It is best-effort and never consulted for correctness; the
//! advisory lock on the open handle is the only signal that matters.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerStamp {
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

impl OwnerStamp {
    pub fn now(pid: u32) -> Self {
        Self {
            pid,
            acquired_at: Utc::now(),
        }
    }
}

/// Replace the lock file content with a one-line JSON stamp.
///
/// Only call while holding the exclusive lock on `file`.
pub fn write_stamp(file: &mut File, stamp: &OwnerStamp) -> Result<()> {
    let line = serde_json::to_string(stamp).context("serialize owner stamp")?;
    file.set_len(0).context("truncate lock file")?;
    file.seek(SeekFrom::Start(0)).context("rewind lock file")?;
    writeln!(file, "{}", line).context("write owner stamp")?;
    file.flush().context("flush owner stamp")?;
    Ok(())
}

/// Read the stamp back, tolerating missing files and garbage content.
pub fn read_stamp(path: &Path) -> Option<OwnerStamp> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(content.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use tempfile::TempDir;

    #[test]
    fn test_stamp_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .unwrap();
        let stamp = OwnerStamp::now(4242);
        write_stamp(&mut file, &stamp).unwrap();

        let read = read_stamp(&path).expect("stamp should parse");
        assert_eq!(read.pid, 4242);
        assert_eq!(read.acquired_at, stamp.acquired_at);
    }

    #[test]
    fn test_restamp_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .unwrap();
        write_stamp(&mut file, &OwnerStamp::now(1)).unwrap();
        write_stamp(&mut file, &OwnerStamp::now(2)).unwrap();
        assert_eq!(read_stamp(&path).unwrap().pid, 2);
        // exactly one line, no leftover bytes from the first stamp
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_read_stamp_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_stamp(&dir.path().join("absent.lock")).is_none());
    }

    #[test]
    fn test_read_stamp_garbage_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.lock");
        std::fs::write(&path, "not json at all\n").unwrap();
        assert!(read_stamp(&path).is_none());
    }
}
