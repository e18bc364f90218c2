use crate::{CliClientResult, ClientError};

use std::time::Duration;

use sm_config::SupervisorConfig;
use sm_proto::{ControlCommand, ControlReply};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Longest reply line accepted from the supervisor.
const MAX_REPLY_BYTES: u64 = 4096;

/// Control-port client: one connection per command.
pub struct Client {
    pub addr: String,
    pub timeout: Duration,
}

impl Client {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Client for the supervisor described by `config`.
    pub fn from_config(config: &SupervisorConfig) -> Self {
        Self::new(config.bind_addr(), config.read_timeout())
    }

    /// Send `command` and return the supervisor's reply, `OK` or `ERROR`.
    pub async fn send(&self, command: &ControlCommand) -> CliClientResult<ControlReply> {
        let stream = timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| ClientError::timeout("connecting to", &self.addr))?
            .map_err(|e| ClientError::connection(&self.addr, e))?;

        let (reader, mut writer) = stream.into_split();

        writer
            .write_all(command.to_message().encode().as_bytes())
            .await
            .map_err(|e| ClientError::io("sending the command", e))?;

        let mut line = String::new();
        let mut reader = BufReader::new(reader.take(MAX_REPLY_BYTES));
        let read = timeout(self.timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| ClientError::timeout("waiting for a reply from", &self.addr))?
            .map_err(|e| ClientError::io("reading the reply", e))?;

        if read == 0 {
            return Err(ClientError::closed());
        }

        Ok(ControlReply::parse(&line)?)
    }

    /// Send `command`, turning an `ERROR` reply into [`ClientError::Rejected`].
    pub async fn execute(&self, command: &ControlCommand) -> CliClientResult<()> {
        match self.send(command).await? {
            ControlReply::Ok => Ok(()),
            ControlReply::Error { reason } => Err(ClientError::rejected(reason)),
        }
    }

    pub async fn reload(&self) -> CliClientResult<()> {
        self.execute(&ControlCommand::Reload).await
    }

    pub async fn start(&self, name: &str) -> CliClientResult<()> {
        self.execute(&ControlCommand::Start {
            name: name.to_string(),
        })
        .await
    }

    pub async fn stop(&self, name: &str) -> CliClientResult<()> {
        self.execute(&ControlCommand::Stop {
            name: name.to_string(),
        })
        .await
    }
}
