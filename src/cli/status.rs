use crate::core::flock;
use crate::core::metadata;
use crate::core::mutex::FileMutex;
use anyhow::{Context, Result};
use clap::Args;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Protected target path (must exist)
    pub target: PathBuf,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let mutex = FileMutex::new(args.target)?;
    let artifact = mutex.artifact();

    let held = match flock::probe(artifact) {
        Ok(held) => held,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            println!("{}: free (no lock file)", artifact.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("probe {}", artifact.display()));
        }
    };

    let stamp = metadata::read_stamp(artifact);
    match (held, stamp) {
        (true, Some(s)) => println!(
            "{}: held (pid {} since {})",
            artifact.display(),
            s.pid,
            s.acquired_at
        ),
        (true, None) => println!("{}: held (no owner stamp)", artifact.display()),
        // the file exists but nobody holds its lock: leftover from an
        // unclean shutdown or a failed release
        (false, Some(s)) => println!(
            "{}: orphaned lock file (last held by pid {} at {})",
            artifact.display(),
            s.pid,
            s.acquired_at
        ),
        (false, None) => println!("{}: orphaned lock file (no owner stamp)", artifact.display()),
    }
    Ok(())
}
