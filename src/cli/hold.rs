use crate::cli::LockFlags;
use crate::core::mutex::FileMutex;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct HoldArgs {
    /// Protected target path (must exist)
    pub target: PathBuf,

    /// How long to hold the lock before releasing
    #[arg(long, value_name = "SECONDS", default_value_t = 5.0)]
    pub seconds: f64,

    #[command(flatten)]
    pub lock: LockFlags,
}

pub fn run(args: HoldArgs) -> Result<()> {
    let options = args.lock.to_options()?;
    let mut mutex = FileMutex::with_options(args.target, options)?;

    mutex.lock()?;
    println!(
        "locked {} (pid {})",
        mutex.artifact().display(),
        std::process::id()
    );

    thread::sleep(Duration::from_secs_f64(args.seconds.max(0.0)));

    mutex.unlock()?;
    println!("released {}", mutex.artifact().display());
    Ok(())
}
