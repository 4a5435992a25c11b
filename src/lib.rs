//! Cross-process mutual exclusion backed by the filesystem.
//!
//! Processes coordinate access to a shared resource by contending for an
//! exclusive advisory lock on a companion lock file (`<target>.lock`) next to
//! the protected resource. Holding the OS-level exclusive lock on that file is
//! the only correctness-bearing signal; the file's existence and content are
//! diagnostic only.
//!
//! ## Modules
//! - `cli` — Command-line handlers (hold / run / status)
//! - `core` — Lock protocol (mutex, flock wrapper, options, owner stamp)

pub mod cli;
pub mod constants;
pub mod core;

pub use crate::core::error::LockError;
pub use crate::core::mutex::FileMutex;
pub use crate::core::options::LockOptions;
