//! ControlListener: one short-lived task per control connection.

use crate::{CommandSender, Result as SupervisorResult, ShutdownCoordinator, SupervisorError};

use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, info, warn};
use sm_proto::{ControlCommand, ControlReply};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};

/// Longest command line accepted from a client.
pub const MAX_COMMAND_BYTES: u64 = 4096;

pub struct ControlListener {
    listener: TcpListener,
    commands: CommandSender,
    read_timeout: Duration,
    shutdown: ShutdownCoordinator,
}

impl ControlListener {
    pub async fn bind(
        addr: &str,
        commands: CommandSender,
        read_timeout: Duration,
        shutdown: ShutdownCoordinator,
    ) -> SupervisorResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| SupervisorError::io(format!("bind control port {addr}"), e))?;

        Ok(Self {
            listener,
            commands,
            read_timeout,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> SupervisorResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| SupervisorError::io("read control port address", e))
    }

    /// Accept connections until shutdown. Dropping the listener on return
    /// stops accepting; connections already accepted finish on their own.
    pub async fn run(self) -> SupervisorResult<()> {
        let mut guard = self.shutdown.subscribe_guard();
        if let Ok(addr) = self.local_addr() {
            info!("Control port listening on {addr}");
        }

        loop {
            tokio::select! {
                _ = guard.wait() => {
                    info!("Control port closed");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let commands = self.commands.clone();
                        let read_timeout = self.read_timeout;
                        tokio::spawn(async move {
                            handle_connection(stream, peer, commands, read_timeout).await;
                        });
                    }
                    Err(e) => warn!("Failed to accept control connection: {e}"),
                },
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    commands: CommandSender,
    read_timeout: Duration,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    let read = tokio::time::timeout(
        read_timeout,
        (&mut reader).take(MAX_COMMAND_BYTES).read_line(&mut line),
    )
    .await;

    let reply = match read {
        Err(_) => ControlReply::error("timed out waiting for a command"),
        Ok(Err(e)) => ControlReply::error(format!("failed to read command: {e}")),
        Ok(Ok(0)) => ControlReply::error("connection closed before a command was received"),
        Ok(Ok(n)) if n as u64 >= MAX_COMMAND_BYTES && !line.ends_with('\n') => {
            // Consume the rest so the client reads the reply instead of a reset.
            let _ = tokio::time::timeout(read_timeout, discard_line(&mut reader)).await;
            ControlReply::error(format!(
                "command too long (more than {MAX_COMMAND_BYTES} bytes)"
            ))
        }
        Ok(Ok(_)) => dispatch(&line, &commands),
    };

    match &reply {
        ControlReply::Ok => debug!("{peer}: {}", line.trim_end()),
        ControlReply::Error { reason } => warn!("{peer}: {:?} -> ERROR {reason}", line.trim_end()),
    }

    if let Err(e) = writer.write_all(reply.encode().as_bytes()).await {
        debug!("{peer}: failed to send reply: {e}");
        return;
    }
    let _ = writer.shutdown().await;
}

/// Skip input up to and including the next newline, in bounded chunks.
async fn discard_line(reader: &mut BufReader<OwnedReadHalf>) -> std::io::Result<()> {
    let mut chunk = Vec::new();
    loop {
        chunk.clear();
        let n = (&mut *reader)
            .take(MAX_COMMAND_BYTES)
            .read_until(b'\n', &mut chunk)
            .await?;
        if n == 0 || chunk.ends_with(b"\n") {
            return Ok(());
        }
    }
}

/// Parse and enqueue one command line. The reply only confirms enqueueing.
///
/// A line that does not parse is answered with the full error, including
/// where it was raised, followed by the line as received.
fn dispatch(line: &str, commands: &CommandSender) -> ControlReply {
    let command = match ControlCommand::parse(line) {
        Ok(command) => command,
        Err(e) => {
            return ControlReply::error(format!("{e}; received: {}", line.trim_end()));
        }
    };

    match commands.send(command) {
        Ok(()) => ControlReply::Ok,
        Err(_) => ControlReply::error("supervisor is shutting down"),
    }
}
