#![allow(dead_code)]

use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sm_core::{Fields, Fleet, ServerEntry, ServerTemplate};
use sm_proto::ControlCommand;
use sm_server::{
    CommandSender, EventLoop, InstanceOptions, Journal, LifecycleEvent, MemoryFleetSource,
    ShutdownCoordinator, command_channel,
};
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub const WAIT: Duration = Duration::from_secs(10);

/// Write an executable `/bin/sh` script.
pub fn script(dir: &Path, file: &str, body: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

/// Fleet rooted at `dir` from `(template, fields)` pairs and server records.
pub fn fleet(dir: &Path, templates: &[(&str, &[(&str, &str)])], servers: &[&[(&str, &str)]]) -> Fleet {
    Fleet::new(
        templates
            .iter()
            .map(|(name, pairs)| ServerTemplate::new(*name, fields(pairs)))
            .collect(),
        servers
            .iter()
            .map(|pairs| ServerEntry::new(fields(pairs)).unwrap())
            .collect(),
        dir,
    )
}

pub fn start(name: &str) -> ControlCommand {
    ControlCommand::Start {
        name: name.to_string(),
    }
}

pub fn stop(name: &str) -> ControlCommand {
    ControlCommand::Stop {
        name: name.to_string(),
    }
}

/// Kill a process from outside the supervisor.
pub fn kill(pid: u32) {
    nix::sys::signal::kill(
        nix::unistd::Pid::from_raw(pid as i32),
        nix::sys::signal::Signal::SIGKILL,
    )
    .unwrap();
}

pub fn is_alive(pid: u32) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
}

/// Event loop running on a background task.
pub struct Harness {
    pub temp: TempDir,
    pub source: MemoryFleetSource,
    pub commands: CommandSender,
    pub events: broadcast::Receiver<LifecycleEvent>,
    pub shutdown: ShutdownCoordinator,
    pub journal_dir: PathBuf,
    task: JoinHandle<sm_server::Result<()>>,
}

impl Harness {
    pub fn start(temp: TempDir, fleet: Fleet) -> Self {
        Self::start_with(temp, fleet, Duration::from_secs(3600))
    }

    pub fn start_with(temp: TempDir, fleet: Fleet, rotation: Duration) -> Self {
        let journal_dir = temp.path().join("logs");
        let journal = Journal::open(&journal_dir, rotation).unwrap();
        let source = MemoryFleetSource::new(fleet.clone());
        let (commands, receiver) = command_channel();
        let shutdown = ShutdownCoordinator::new();

        let event_loop = EventLoop::new(
            fleet,
            Box::new(source.clone()),
            journal,
            receiver,
            shutdown.subscribe_guard(),
            InstanceOptions {
                tail_lines: 5,
                output_drain: Duration::from_millis(200),
            },
        );
        let events = event_loop.subscribe();
        let task = tokio::spawn(event_loop.run());

        Self {
            temp,
            source,
            commands,
            events,
            shutdown,
            journal_dir,
            task,
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp.path()
    }

    pub fn send(&self, command: ControlCommand) {
        self.commands.send(command).unwrap();
    }

    pub async fn next(&mut self) -> LifecycleEvent {
        timeout(WAIT, self.events.recv()).await.unwrap().unwrap()
    }

    /// Skip events until one matches.
    pub async fn expect<F>(&mut self, predicate: F) -> LifecycleEvent
    where
        F: Fn(&LifecycleEvent) -> bool,
    {
        loop {
            let event = self.next().await;
            if predicate(&event) {
                return event;
            }
        }
    }

    /// Wait for `name` to start and return its pid.
    pub async fn started(&mut self, name: &str) -> (u32, String) {
        match self
            .expect(|e| matches!(e, LifecycleEvent::Started { .. }) && e.name() == Some(name))
            .await
        {
            LifecycleEvent::Started {
                pid, command_line, ..
            } => (pid.unwrap(), command_line),
            other => panic!("unexpected {other:?}"),
        }
    }

    /// Concatenated contents of every journal file.
    pub fn journal(&self) -> String {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.journal_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        paths.sort();
        paths
            .iter()
            .map(|path| std::fs::read_to_string(path).unwrap())
            .collect()
    }

    pub async fn shutdown(self) -> (sm_server::Result<()>, broadcast::Receiver<LifecycleEvent>) {
        self.shutdown.shutdown();
        let result = timeout(WAIT, self.task).await.unwrap().unwrap();
        (result, self.events)
    }
}
