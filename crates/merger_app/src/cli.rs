use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

#[derive(Debug, Clone, Parser)]
#[command(name = "merger")]
#[command(
    about = "Upload a ZIP of Word documents to the merge service and follow the job",
    long_about = None
)]
pub struct Args {
    /// ZIP archive to submit right away
    pub archive: Option<PathBuf>,

    /// RON configuration file (defaults are used when it does not exist)
    #[arg(long, default_value = "merger.ron")]
    pub config: PathBuf,

    /// Base URL of the merge service
    #[arg(long)]
    pub server: Option<String>,

    /// Interval between status polls, in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Consecutive failed polls tolerated before the job is marked failed
    #[arg(long)]
    pub max_poll_failures: Option<u32>,

    /// Directory merged documents are saved to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Exit as soon as the job completes or fails
    #[arg(long)]
    pub exit_when_done: bool,

    /// Write the effective configuration to the --config path and continue
    #[arg(long)]
    pub write_config: bool,
}
