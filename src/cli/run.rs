use crate::cli::LockFlags;
use crate::core::mutex::FileMutex;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::process::Command;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Protected target path (must exist)
    pub target: PathBuf,

    #[command(flatten)]
    pub lock: LockFlags,

    /// Command to run while the lock is held
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

pub fn run(args: RunArgs) -> Result<()> {
    let options = args.lock.to_options()?;
    let mut mutex = FileMutex::with_options(args.target, options)?;

    mutex.lock()?;
    let status = Command::new(&args.command[0])
        .args(&args.command[1..])
        .status()
        .with_context(|| format!("spawn {}", args.command[0]));

    // release before judging the child: the critical section ends here either way
    mutex.unlock()?;

    let status = status?;
    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}
