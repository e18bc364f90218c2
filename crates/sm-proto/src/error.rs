use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("Empty message {location}")]
    Empty { location: ErrorLocation },

    #[error("Unterminated quoted argument in '{line}' {location}")]
    UnterminatedQuote {
        line: String,
        location: ErrorLocation,
    },

    #[error("Unknown command '{name}' {location}")]
    UnknownCommand {
        name: String,
        location: ErrorLocation,
    },

    #[error("Command {command} expects {expected} argument(s), got {actual} {location}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        actual: usize,
        location: ErrorLocation,
    },

    #[error("Unknown reply '{name}' {location}")]
    UnknownReply {
        name: String,
        location: ErrorLocation,
    },
}

impl ProtoError {
    #[track_caller]
    pub fn empty() -> Self {
        Self::Empty {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unterminated_quote(line: &str) -> Self {
        Self::UnterminatedQuote {
            line: line.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_command(name: &str) -> Self {
        Self::UnknownCommand {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn argument_count(command: &'static str, expected: usize, actual: usize) -> Self {
        Self::ArgumentCount {
            command,
            expected,
            actual,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_reply(name: &str) -> Self {
        Self::UnknownReply {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short reason without the source location.
    pub fn reason(&self) -> String {
        match self {
            Self::Empty { .. } => "empty command".to_string(),
            Self::UnterminatedQuote { .. } => "unterminated quoted argument".to_string(),
            Self::UnknownCommand { name, .. } => format!("unknown command '{name}'"),
            Self::ArgumentCount {
                command,
                expected,
                actual,
                ..
            } => format!("{command} expects {expected} argument(s), got {actual}"),
            Self::UnknownReply { name, .. } => format!("unknown reply '{name}'"),
        }
    }
}

pub type Result<T> = StdResult<T, ProtoError>;
