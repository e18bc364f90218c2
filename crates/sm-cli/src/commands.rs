use clap::Subcommand;
use sm_proto::ControlCommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Re-read the fleet definition (running instances keep their settings)
    Reload,

    /// Start the named server
    Start { name: String },

    /// Stop the named server
    Stop { name: String },

    /// Probe every server advertising a host and port
    Status,

    /// List every server with its working directory and command line
    List,
}

impl Commands {
    /// Control-port request for commands handled by the supervisor.
    pub fn control_command(&self) -> Option<ControlCommand> {
        match self {
            Self::Reload => Some(ControlCommand::Reload),
            Self::Start { name } => Some(ControlCommand::Start { name: name.clone() }),
            Self::Stop { name } => Some(ControlCommand::Stop { name: name.clone() }),
            Self::Status | Self::List => None,
        }
    }
}
