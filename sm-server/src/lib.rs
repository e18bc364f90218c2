//! Supervisor daemon: keeps a configured fleet of server processes alive.
//!
//! Control commands arrive on a TCP port ([`ControlListener`]), travel
//! through the [`CommandSender`]/[`CommandReceiver`] pair and are executed by
//! the single [`EventLoop`] task, which also watches every child's output and
//! exit.

pub mod channel;
pub mod error;
pub mod event_loop;
pub mod fleet_source;
pub mod instance;
pub mod journal;
pub mod lifecycle_event;
pub mod listener;
pub mod logger;
pub mod registry;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod signals;

#[cfg(test)]
mod tests;

pub use channel::{CommandReceiver, CommandSender, command_channel};
pub use error::{Result, SupervisorError};
pub use event_loop::EventLoop;
pub use fleet_source::{FleetSource, MemoryFleetSource, TomlFleetSource};
pub use instance::{InstanceEvent, InstanceHandle, InstanceOptions};
pub use journal::Journal;
pub use lifecycle_event::LifecycleEvent;
pub use listener::ControlListener;
pub use registry::{InstanceSnapshot, ProcessRegistry};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;

use std::path::PathBuf;

use log::{error, info};
use sm_config::{Config, DEFAULT_CONFIG_FILENAME};

/// Run the supervisor described by `config` until `shutdown` triggers.
///
/// Binds the control port, starts the fleet and serves commands. Returns
/// after every child has been terminated.
pub async fn run(config: Config, shutdown: ShutdownCoordinator) -> Result<()> {
    let fleet = config.fleet()?;
    let source_path = match config.source() {
        Some(path) => path.to_path_buf(),
        None => config.base_dir()?.join(DEFAULT_CONFIG_FILENAME),
    };
    let source = TomlFleetSource::new(source_path);

    let log_dir: PathBuf = config.log_dir()?;
    let journal = Journal::open(&log_dir, config.logging.rotation())?;
    info!("Journal: {}", journal.path().display());

    let (commands_tx, commands_rx) = command_channel();
    let listener = ControlListener::bind(
        &config.supervisor.bind_addr(),
        commands_tx,
        config.supervisor.read_timeout(),
        shutdown.clone(),
    )
    .await?;

    let event_loop = EventLoop::new(
        fleet,
        Box::new(source),
        journal,
        commands_rx,
        shutdown.subscribe_guard(),
        InstanceOptions::from(&config.process),
    );

    let listener_task = tokio::spawn(listener.run());
    let result = event_loop.run().await;

    // The loop may have failed on its own; make sure the listener stops too.
    shutdown.shutdown();
    match listener_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Control listener failed: {e}"),
        Err(e) => error!("Control listener task panicked: {e}"),
    }

    result
}
