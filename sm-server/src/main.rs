use sm_server::{ShutdownCoordinator, logger, signals};

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use sm_config::{Config, LogLevel};

/// Supervisor daemon for the server farm
#[derive(Parser)]
#[command(name = "sm-server", version, about)]
struct Args {
    /// Configuration file (default: ./server-manager.toml or $SM_CONFIG)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log at debug level, including every journal line
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Load and validate configuration
    let config = Config::load(args.config.as_deref())?;
    config.validate()?;

    let level = if args.verbose {
        LogLevel(log::LevelFilter::Debug)
    } else {
        config.logging.level
    };

    // Initialize logger (before any other logging)
    logger::initialize(level, config.logging.colored)?;

    info!("Starting sm-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let shutdown = ShutdownCoordinator::new();
    signals::install(shutdown.clone())?;

    sm_server::run(config, shutdown).await?;

    info!("Supervisor stopped");
    Ok(())
}
