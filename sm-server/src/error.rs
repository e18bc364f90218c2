use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Config error: {0}")]
    Config(#[from] sm_config::ConfigError),

    #[error(transparent)]
    Resolve(#[from] sm_core::CoreError),

    #[error("Failed to spawn '{name}' ({program}): {source} {location}")]
    Spawn {
        name: String,
        program: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to send SIGTERM to '{name}' (pid {pid}): {source} {location}")]
    Terminate {
        name: String,
        pid: u32,
        #[source]
        source: nix::Error,
        location: ErrorLocation,
    },

    #[error("Server '{name}' is already running {location}")]
    AlreadyRunning {
        name: String,
        location: ErrorLocation,
    },

    #[error("Server '{name}' is not running {location}")]
    NotRunning {
        name: String,
        location: ErrorLocation,
    },

    #[error("Command channel closed {location}")]
    ChannelClosed { location: ErrorLocation },

    #[error("Instance event channel closed {location}")]
    EventChannelClosed { location: ErrorLocation },

    #[error("Journal error at {path}: {source} {location}")]
    Journal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Fleet source error: {message} {location}")]
    FleetSource {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to {action}: {source} {location}")]
    Io {
        action: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Logger error: {message}")]
    Logger { message: String },
}

impl SupervisorError {
    #[track_caller]
    pub fn spawn(name: &str, program: &str, source: std::io::Error) -> Self {
        Self::Spawn {
            name: name.to_string(),
            program: program.to_string(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn terminate(name: &str, pid: u32, source: nix::Error) -> Self {
        Self::Terminate {
            name: name.to_string(),
            pid,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn already_running(name: &str) -> Self {
        Self::AlreadyRunning {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_running(name: &str) -> Self {
        Self::NotRunning {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn channel_closed() -> Self {
        Self::ChannelClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn event_channel_closed() -> Self {
        Self::EventChannelClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn journal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Journal {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn fleet_source(message: impl Into<String>) -> Self {
        Self::FleetSource {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(action: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            action: action.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, SupervisorError>;
