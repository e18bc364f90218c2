use crate::{Cli, Commands};

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use googletest::prelude::*;
use sm_proto::ControlCommand;

#[test]
fn given_start_with_name_when_parsing_then_start_command() {
    // When
    let cli = Cli::try_parse_from(["sm", "start", "compilox1"]).unwrap();

    // Then
    assert_that!(
        cli.command,
        eq(&Commands::Start {
            name: "compilox1".to_string()
        })
    );
    assert_that!(
        cli.command.control_command(),
        some(eq(&ControlCommand::Start {
            name: "compilox1".to_string()
        }))
    );
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
    // When
    let cli = Cli::try_parse_from(["sm", "status", "--json", "-v", "--config", "farm.toml"]).unwrap();

    // Then
    assert_that!(cli.command, eq(&Commands::Status));
    assert_that!(cli.json, eq(true));
    assert_that!(cli.verbose, eq(true));
    assert_that!(cli.config, some(eq(&PathBuf::from("farm.toml"))));
}

#[test]
fn given_no_probe_timeout_when_parsing_then_two_second_default() {
    // When
    let cli = Cli::try_parse_from(["sm", "list"]).unwrap();

    // Then
    assert_that!(cli.probe_timeout(), eq(Duration::from_secs(2)));
    assert_that!(cli.command.control_command(), none());
}

#[test]
fn given_stop_without_name_when_parsing_then_error() {
    // When
    let result = Cli::try_parse_from(["sm", "stop"]);

    // Then
    assert_that!(result.is_err(), eq(true));
}

#[test]
fn given_reload_when_mapping_then_reload_request() {
    // When
    let cli = Cli::try_parse_from(["sm", "reload"]).unwrap();

    // Then
    assert_that!(cli.command.control_command(), some(eq(&ControlCommand::Reload)));
}
