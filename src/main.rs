use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = filemutex::cli::Cli::parse();
    cli.run()
}
