//! Core lock protocol modules.

pub mod error;
pub mod flock;
pub mod metadata;
pub mod mutex;
pub mod options;
