use std::io;
use std::panic::Location;

use error_location::ErrorLocation;
use sm_config::ConfigError;
use sm_proto::ProtoError;
use thiserror::Error;

/// Errors raised by the operator CLI.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot connect to the supervisor at {addr}: {source} {location}")]
    Connection {
        addr: String,
        location: ErrorLocation,
        #[source]
        source: io::Error,
    },

    #[error("Timed out {action} {addr} {location}")]
    Timeout {
        action: &'static str,
        addr: String,
        location: ErrorLocation,
    },

    #[error("I/O error while {action}: {source} {location}")]
    Io {
        action: &'static str,
        location: ErrorLocation,
        #[source]
        source: io::Error,
    },

    #[error("Supervisor closed the connection without replying {location}")]
    Closed { location: ErrorLocation },

    #[error("Malformed reply: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
        #[source]
        source: ProtoError,
    },

    #[error("{reason}")]
    Rejected {
        reason: String,
        location: ErrorLocation,
    },

    #[error("JSON encoding error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    #[track_caller]
    pub fn connection(addr: &str, source: io::Error) -> Self {
        Self::Connection {
            addr: addr.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn timeout(action: &'static str, addr: &str) -> Self {
        Self::Timeout {
            action,
            addr: addr.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(action: &'static str, source: io::Error) -> Self {
        Self::Io {
            action,
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }

    #[track_caller]
    pub fn closed() -> Self {
        Self::Closed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }
}

impl From<ProtoError> for ClientError {
    #[track_caller]
    fn from(err: ProtoError) -> Self {
        Self::Protocol {
            message: err.reason(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::from_json(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
