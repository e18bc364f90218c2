use crate::{ERROR, Message, OK, ProtoError, RELOAD, Result as ProtoResult, START, STOP};

use std::fmt;

/// Request sent by an operator to the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Re-read the fleet definition.
    Reload,
    /// Start the named instance.
    Start { name: String },
    /// Stop the named instance.
    Stop { name: String },
}

impl ControlCommand {
    #[track_caller]
    pub fn parse(line: &str) -> ProtoResult<Self> {
        Self::from_message(&Message::parse(line)?)
    }

    #[track_caller]
    pub fn from_message(message: &Message) -> ProtoResult<Self> {
        let args = message.args();

        match message.name() {
            RELOAD => match args {
                [] => Ok(Self::Reload),
                _ => Err(ProtoError::argument_count(RELOAD, 0, args.len())),
            },
            START => match args {
                [name] => Ok(Self::Start { name: name.clone() }),
                _ => Err(ProtoError::argument_count(START, 1, args.len())),
            },
            STOP => match args {
                [name] => Ok(Self::Stop { name: name.clone() }),
                _ => Err(ProtoError::argument_count(STOP, 1, args.len())),
            },
            other => Err(ProtoError::unknown_command(other)),
        }
    }

    pub fn to_message(&self) -> Message {
        match self {
            Self::Reload => Message::new(RELOAD),
            Self::Start { name } => Message::new(START).with_arg(name),
            Self::Stop { name } => Message::new(STOP).with_arg(name),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_message())
    }
}

/// Reply terminating a control exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlReply {
    Ok,
    Error { reason: String },
}

impl ControlReply {
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn to_message(&self) -> Message {
        match self {
            Self::Ok => Message::new(OK),
            Self::Error { reason } => Message::new(ERROR).with_arg(reason),
        }
    }

    pub fn encode(&self) -> String {
        self.to_message().encode()
    }

    #[track_caller]
    pub fn parse(line: &str) -> ProtoResult<Self> {
        let message = Message::parse(line)?;

        match message.name() {
            OK => Ok(Self::Ok),
            ERROR => Ok(Self::Error {
                reason: message.args().join(" "),
            }),
            other => Err(ProtoError::unknown_reply(other)),
        }
    }
}
