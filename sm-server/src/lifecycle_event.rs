use std::fmt;
use std::path::PathBuf;

/// State change published by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Started {
        name: String,
        pid: Option<u32>,
        command_line: String,
    },
    Stopped {
        name: String,
        status: String,
    },
    Crashed {
        name: String,
        status: String,
    },
    SpawnFailed {
        name: String,
        reason: String,
    },
    /// A crashed instance could not be re-resolved and stays absent.
    RestartSkipped {
        name: String,
        reason: String,
    },
    StartRejected {
        name: String,
        reason: String,
    },
    StopRejected {
        name: String,
        reason: String,
    },
    Reloaded {
        servers: usize,
    },
    ReloadFailed {
        reason: String,
    },
    Rotated {
        path: PathBuf,
    },
}

impl LifecycleEvent {
    /// Instance the event is about, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Started { name, .. }
            | Self::Stopped { name, .. }
            | Self::Crashed { name, .. }
            | Self::SpawnFailed { name, .. }
            | Self::RestartSkipped { name, .. }
            | Self::StartRejected { name, .. }
            | Self::StopRejected { name, .. } => Some(name),
            Self::Reloaded { .. } | Self::ReloadFailed { .. } | Self::Rotated { .. } => None,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started {
                name,
                pid,
                command_line,
            } => match pid {
                Some(pid) => write!(f, "Started '{name}' (pid {pid}): {command_line}"),
                None => write!(f, "Started '{name}': {command_line}"),
            },
            Self::Stopped { name, status } => write!(f, "Stopped '{name}' ({status})"),
            Self::Crashed { name, status } => write!(f, "'{name}' crashed ({status})"),
            Self::SpawnFailed { name, reason } => write!(f, "Failed to start '{name}': {reason}"),
            Self::RestartSkipped { name, reason } => {
                write!(f, "Not restarting '{name}': {reason}")
            }
            Self::StartRejected { name, reason } => {
                write!(f, "START {name} rejected: {reason}")
            }
            Self::StopRejected { name, reason } => write!(f, "STOP {name} rejected: {reason}"),
            Self::Reloaded { servers } => {
                write!(f, "Configuration reloaded ({servers} server(s))")
            }
            Self::ReloadFailed { reason } => {
                write!(f, "Reload failed, keeping previous configuration: {reason}")
            }
            Self::Rotated { path } => write!(f, "Journal rotated to {}", path.display()),
        }
    }
}
