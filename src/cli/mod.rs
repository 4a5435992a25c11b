//! CLI routing and command dispatch.

use crate::constants;
use crate::core::options::LockOptions;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

pub mod hold;
pub mod run;
pub mod status;

#[derive(Parser, Debug)]
#[command(
    name = "filemutex",
    version,
    about = "Coordinate processes through advisory locks on companion lock files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Hold(args) => hold::run(args),
            Commands::Run(args) => run::run(args),
            Commands::Status(args) => status::run(args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Acquire the lock and hold it for a fixed time (for multi-process demos)
    Hold(hold::HoldArgs),
    /// Run a command while holding the lock
    Run(run::RunArgs),
    /// Report the lock state of a target (safe, read-only probe)
    Status(status::StatusArgs),
}

/// Lock tuning flags shared by commands that acquire the lock.
#[derive(Args, Debug)]
pub struct LockFlags {
    /// Give up after this many seconds (0 = wait forever)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub timeout: f64,

    /// Pause between lock attempts in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    pub pause: f64,

    /// How many consecutive unexpected failures to tolerate before giving up
    #[arg(long, value_name = "COUNT", default_value_t = constants::DEFAULT_RETRY_MAX)]
    pub retries: u32,
}

impl LockFlags {
    pub fn to_options(&self) -> Result<LockOptions> {
        let options = LockOptions::new()
            .with_retry_max(self.retries)
            .with_pause_secs(self.pause)?
            .with_max_wait_secs(self.timeout)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_lock_flags_defaults_map_to_default_options() {
        let flags = LockFlags {
            timeout: 0.0,
            pause: 0.1,
            retries: constants::DEFAULT_RETRY_MAX,
        };
        let options = flags.to_options().unwrap();
        assert_eq!(options.retry_max, constants::DEFAULT_RETRY_MAX);
        assert_eq!(options.pause, Duration::from_millis(100));
        assert!(options.max_wait.is_zero());
    }

    #[test]
    fn test_lock_flags_reject_bad_values() {
        let flags = LockFlags {
            timeout: -1.0,
            pause: 0.1,
            retries: 0,
        };
        assert!(flags.to_options().is_err());

        let flags = LockFlags {
            timeout: 0.0,
            pause: 0.0,
            retries: 0,
        };
        assert!(flags.to_options().is_err());
    }
}
