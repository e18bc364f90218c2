use crate::commands::Commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;

#[derive(Parser, Debug)]
#[command(name = "sm")]
#[command(about = "Control the server-manager supervisor and inspect its fleet")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./server-manager.toml or $SM_CONFIG)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Echo the exchanged protocol lines on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print `status` and `list` as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Connect timeout of each `status` probe, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    pub probe_timeout_ms: u64,
}

impl Cli {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}
