//! sm-cli library
//!
//! Operator side of the supervisor: `reload`, `start` and `stop` go through
//! the control port; `status` and `list` are computed locally from the
//! configuration file.

pub mod cli;
pub mod client;
pub mod commands;
pub mod list;
pub mod status;
pub(crate) mod table;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use client::{CliClientResult, Client, ClientError};
pub use commands::Commands;
pub use list::ServerListing;
pub use status::{Reachability, ServerStatus};

use sm_config::Config;
use sm_core::{Fleet, Spec};
use sm_proto::{ControlCommand, ControlReply};

/// Confirmation printed after an `OK` reply.
pub const SENT_MESSAGE: &str = "Command successfully sent to the supervisor";

/// Execute `cli` and return the text to print on stdout.
pub async fn run(cli: &Cli) -> CliClientResult<String> {
    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.control_command() {
        Some(command) => {
            let client = Client::from_config(&config.supervisor);
            send(&client, &command, cli.verbose).await
        }
        None => report(cli, &config).await,
    }
}

/// `status` or `list`, computed from the configuration alone.
async fn report(cli: &Cli, config: &Config) -> CliClientResult<String> {
    let specs = resolve_fleet(&config.fleet()?);

    if matches!(cli.command, Commands::Status) {
        let statuses = status::collect(&specs, cli.probe_timeout()).await;
        if cli.json {
            return Ok(serde_json::to_string_pretty(&statuses)?);
        }
        return Ok(status::render(&statuses));
    }

    let listings: Vec<ServerListing> = specs.iter().map(ServerListing::from).collect();
    if cli.json {
        return Ok(serde_json::to_string_pretty(&listings)?);
    }
    Ok(list::render(&listings))
}

async fn send(client: &Client, command: &ControlCommand, verbose: bool) -> CliClientResult<String> {
    if verbose {
        eprintln!("-> {} {}", client.addr, command);
    }

    let reply = client.send(command).await?;

    if verbose {
        eprintln!("<- {}", reply.to_message());
    }

    match reply {
        ControlReply::Ok => Ok(SENT_MESSAGE.to_string()),
        ControlReply::Error { reason } => Err(ClientError::rejected(reason)),
    }
}

/// Resolve every configured instance; unresolvable ones are reported on
/// stderr and left out.
fn resolve_fleet(fleet: &Fleet) -> Vec<Spec> {
    fleet
        .resolve_all()
        .into_iter()
        .filter_map(|(name, resolved)| match resolved {
            Ok(spec) => Some(spec),
            Err(e) => {
                eprintln!("Skipping '{name}': {e}");
                None
            }
        })
        .collect()
}
