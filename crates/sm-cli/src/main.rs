//! sm - operator CLI for the server-manager supervisor
//!
//! # Examples
//!
//! ```bash
//! # Ask the supervisor to re-read its fleet definition
//! sm reload
//!
//! # Start / stop one server
//! sm start compilox1
//! sm stop compilox1
//!
//! # Probe every server, as JSON
//! sm status --json
//!
//! # Show what each server would be launched with
//! sm --config /etc/server-manager.toml list
//! ```

use sm_cli::{Cli, ClientError};

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match sm_cli::run(&cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(ClientError::Rejected { reason, .. }) => {
            eprintln!("ERROR {reason}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
