use std::process;

use anyhow::Context;
use clap::Parser;
use merger_app::Args;
use merger_core::JobPhase;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let phase = merger_app::run(args).context("merger stopped with an error")?;
    if phase == JobPhase::Error {
        process::exit(1);
    }
    Ok(())
}
