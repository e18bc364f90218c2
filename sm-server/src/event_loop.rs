//! The supervisor's single consumer.
//!
//! One task owns the registry, the fleet snapshot and the journal. Each
//! iteration waits on the command channel, the aggregated instance events,
//! the journal rotation deadline and shutdown, then handles what was already
//! queued at that point before waiting again. Anything arriving meanwhile
//! waits for the next iteration, so a child that never stops printing cannot
//! keep commands or shutdown from being served.

use crate::{
    CommandReceiver, FleetSource, InstanceEvent, InstanceHandle, InstanceOptions, Journal,
    LifecycleEvent, ProcessRegistry, Result as SupervisorResult, ShutdownGuard, SupervisorError,
};

use std::process::ExitStatus;
use std::sync::Arc;

use log::{error, info, warn};
use sm_core::Fleet;
use sm_proto::ControlCommand;
use tokio::sync::{broadcast, mpsc};

const LIFECYCLE_CAPACITY: usize = 256;
/// Pending output lines and exits across all instances.
const EVENT_CAPACITY: usize = 1024;

pub struct EventLoop {
    fleet: Arc<Fleet>,
    source: Box<dyn FleetSource>,
    registry: ProcessRegistry,
    journal: Journal,
    commands: CommandReceiver,
    commands_open: bool,
    events_tx: mpsc::Sender<InstanceEvent>,
    events_rx: mpsc::Receiver<InstanceEvent>,
    lifecycle: broadcast::Sender<LifecycleEvent>,
    shutdown: ShutdownGuard,
    options: InstanceOptions,
    next_id: u64,
}

impl EventLoop {
    pub fn new(
        fleet: Fleet,
        source: Box<dyn FleetSource>,
        journal: Journal,
        commands: CommandReceiver,
        shutdown: ShutdownGuard,
        options: InstanceOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);
        let (lifecycle, _) = broadcast::channel(LIFECYCLE_CAPACITY);

        Self {
            fleet: Arc::new(fleet),
            source,
            registry: ProcessRegistry::new(),
            journal,
            commands,
            commands_open: true,
            events_tx,
            events_rx,
            lifecycle,
            shutdown,
            options,
            next_id: 0,
        }
    }

    /// Receive every lifecycle event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle.subscribe()
    }

    /// Start the whole fleet, then serve until shutdown.
    ///
    /// Children are terminated before returning, also when the loop fails.
    pub async fn run(mut self) -> SupervisorResult<()> {
        let result = self.serve().await;
        if let Err(e) = &result {
            error!("Event loop failed: {e}");
        }

        self.commands.close();
        let terminated = self.terminate_all().await;

        result.and(terminated)
    }

    async fn serve(&mut self) -> SupervisorResult<()> {
        self.journal.write(&format!(
            "Supervisor started, configuration from {}",
            self.source.describe()
        ))?;
        self.boot()?;

        loop {
            let deadline = self.journal.deadline();

            tokio::select! {
                _ = self.shutdown.wait() => {
                    self.journal.write("Shutdown requested")?;
                    return Ok(());
                }
                command = self.commands.receive(), if self.commands_open => match command {
                    Some(command) => self.handle_command(command).await?,
                    None => {
                        warn!("All command senders are gone, no more control commands");
                        self.commands_open = false;
                    }
                },
                event = self.events_rx.recv() => match event {
                    Some(event) => self.handle_instance_event(event)?,
                    // We hold a sender ourselves.
                    None => return Err(SupervisorError::event_channel_closed()),
                },
                _ = tokio::time::sleep_until(deadline) => self.rotate()?,
            }

            self.drain_ready().await?;
        }
    }

    async fn drain_ready(&mut self) -> SupervisorResult<()> {
        for _ in 0..self.events_rx.len() {
            let Ok(event) = self.events_rx.try_recv() else {
                break;
            };
            self.handle_instance_event(event)?;
        }
        for _ in 0..self.commands.len() {
            let Some(command) = self.commands.try_receive() else {
                break;
            };
            self.handle_command(command).await?;
        }
        Ok(())
    }

    fn boot(&mut self) -> SupervisorResult<()> {
        let names: Vec<String> = self.fleet.names().into_iter().map(String::from).collect();
        info!("Starting {} configured server(s)", names.len());

        for name in names {
            self.start(&name)?;
        }
        Ok(())
    }

    async fn handle_command(&mut self, command: ControlCommand) -> SupervisorResult<()> {
        self.journal.write(&format!("Received {command}"))?;

        match command {
            ControlCommand::Reload => self.reload(),
            ControlCommand::Start { name } => self.start(&name),
            ControlCommand::Stop { name } => self.stop(&name).await,
        }
    }

    fn handle_instance_event(&mut self, event: InstanceEvent) -> SupervisorResult<()> {
        match event {
            InstanceEvent::Output { name, id, line } => {
                if let Some(handle) = self.registry.get_mut(&name)
                    && handle.id() == id
                {
                    handle.record_output(&line);
                }
                self.journal.output(&name, &line)
            }
            InstanceEvent::Exited { name, id, status } => {
                if !self.registry.is_current(&name, id) {
                    // A stopped or replaced instance; nothing to restart.
                    return Ok(());
                }
                self.crashed(&name, status)
            }
        }
    }

    fn reload(&mut self) -> SupervisorResult<()> {
        match self.source.load() {
            Ok(fleet) => {
                let servers = fleet.entries().len();
                self.fleet = Arc::new(fleet);
                self.publish(LifecycleEvent::Reloaded { servers })
            }
            Err(e) => self.publish(LifecycleEvent::ReloadFailed {
                reason: e.to_string(),
            }),
        }
    }

    /// Resolve `name` against the current fleet and spawn it.
    fn start(&mut self, name: &str) -> SupervisorResult<()> {
        if self.registry.contains(name) {
            return self.publish(LifecycleEvent::StartRejected {
                name: name.to_string(),
                reason: "already running".to_string(),
            });
        }

        match self.fleet.resolve(name) {
            Ok(spec) => self.spawn(Arc::new(spec)),
            Err(e) => self.publish(LifecycleEvent::StartRejected {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn stop(&mut self, name: &str) -> SupervisorResult<()> {
        let handle = match self.registry.unregister(name) {
            Ok(handle) => handle,
            Err(e) => {
                return self.publish(LifecycleEvent::StopRejected {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let status = describe_status(handle.stop().await);
        self.publish(LifecycleEvent::Stopped {
            name: name.to_string(),
            status,
        })
    }

    /// An instance exited on its own: report it and try one restart.
    fn crashed(&mut self, name: &str, status: Option<ExitStatus>) -> SupervisorResult<()> {
        let handle = self.registry.unregister(name)?;

        let tail: Vec<String> = handle.tail().map(String::from).collect();
        drop(handle);

        self.publish(LifecycleEvent::Crashed {
            name: name.to_string(),
            status: describe_status(status),
        })?;
        if !tail.is_empty() {
            self.journal
                .write(&format!("Last {} line(s) of '{name}':", tail.len()))?;
            for line in &tail {
                self.journal.output(name, line)?;
            }
        }

        match self.fleet.resolve(name) {
            Ok(spec) => {
                self.journal.write(&format!("Restarting '{name}'"))?;
                self.spawn(Arc::new(spec))
            }
            Err(e) => self.publish(LifecycleEvent::RestartSkipped {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn spawn(&mut self, spec: Arc<sm_core::Spec>) -> SupervisorResult<()> {
        let name = spec.name().to_string();
        self.next_id += 1;

        match InstanceHandle::spawn(spec, self.next_id, self.events_tx.clone(), &self.options) {
            Ok(handle) => {
                let event = LifecycleEvent::Started {
                    name: name.clone(),
                    pid: handle.pid(),
                    command_line: handle.command_line().to_string(),
                };
                self.registry.register(&name, handle)?;
                self.publish(event)
            }
            Err(e) => self.publish(LifecycleEvent::SpawnFailed {
                name,
                reason: e.to_string(),
            }),
        }
    }

    fn rotate(&mut self) -> SupervisorResult<()> {
        let path = self.journal.rotate()?.to_path_buf();
        self.publish(LifecycleEvent::Rotated { path })
    }

    /// SIGTERM every live instance and wait for each.
    async fn terminate_all(&mut self) -> SupervisorResult<()> {
        let instances = self.registry.drain();
        if !instances.is_empty() {
            info!("Stopping {} running server(s)", instances.len());
        }

        let mut result = Ok(());
        for (name, handle) in instances {
            let status = describe_status(handle.stop().await);
            let published = self.publish(LifecycleEvent::Stopped { name, status });
            if result.is_ok() {
                result = published;
            }
        }
        result
    }

    /// Journal the event, mirror it to the console and notify subscribers.
    fn publish(&mut self, event: LifecycleEvent) -> SupervisorResult<()> {
        match &event {
            LifecycleEvent::Started { .. }
            | LifecycleEvent::Stopped { .. }
            | LifecycleEvent::Reloaded { .. }
            | LifecycleEvent::Rotated { .. } => info!("{event}"),
            LifecycleEvent::Crashed { .. } | LifecycleEvent::RestartSkipped { .. } => {
                warn!("{event}")
            }
            LifecycleEvent::SpawnFailed { .. }
            | LifecycleEvent::StartRejected { .. }
            | LifecycleEvent::StopRejected { .. }
            | LifecycleEvent::ReloadFailed { .. } => error!("{event}"),
        }

        let written = self.journal.write(&event.to_string());
        // No subscriber is fine.
        let _ = self.lifecycle.send(event);
        written
    }
}

fn describe_status(status: Option<ExitStatus>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "exit status unknown".to_string(),
    }
}
