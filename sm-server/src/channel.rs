//! CommandChannel: many producers, one consumer (the event loop).

use crate::{Result as SupervisorResult, SupervisorError};

use sm_proto::ControlCommand;
use tokio::sync::mpsc;

/// Create a connected sender/receiver pair.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Cloneable producer side, one clone per connection handler.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<ControlCommand>,
}

impl CommandSender {
    /// Enqueue a command. Never blocks; fails once the receiver is gone.
    #[track_caller]
    pub fn send(&self, command: ControlCommand) -> SupervisorResult<()> {
        self.tx
            .send(command)
            .map_err(|_| SupervisorError::channel_closed())
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single consumer side, owned by the event loop.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<ControlCommand>,
}

impl CommandReceiver {
    /// Wait for the next command. `None` once every sender is dropped.
    pub async fn receive(&mut self) -> Option<ControlCommand> {
        self.rx.recv().await
    }

    /// Next command if one is already queued.
    pub fn try_receive(&mut self) -> Option<ControlCommand> {
        self.rx.try_recv().ok()
    }

    /// Commands queued right now.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Refuse further commands; already queued ones can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
