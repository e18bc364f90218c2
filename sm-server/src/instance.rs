//! One supervised child process.
//!
//! Spawning starts two helper tasks per instance: one reader for the output
//! pipe, which stdout and stderr share so that lines keep the order they were
//! written in, and one watcher that owns the process handle. They only report
//! onto the shared event channel; the registry belongs to the event loop.
//! The channel is bounded, so a chatty child blocks on its own pipe instead
//! of growing the supervisor's memory.

use crate::{Result as SupervisorResult, SupervisorError};

use std::collections::VecDeque;
use std::os::fd::OwnedFd;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use sm_core::{CommandLine, Spec};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Something an instance's helper tasks observed.
#[derive(Debug)]
pub enum InstanceEvent {
    /// One line of stdout or stderr.
    Output { name: String, id: u64, line: String },
    /// The process ended without a stop request. `None` if waiting failed.
    Exited {
        name: String,
        id: u64,
        status: Option<ExitStatus>,
    },
}

/// Tunables for spawned instances.
#[derive(Debug, Clone)]
pub struct InstanceOptions {
    /// Recent output lines kept for crash reports
    pub tail_lines: usize,
    /// Grace period for output still buffered in the pipes after exit
    pub output_drain: Duration,
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            tail_lines: 20,
            output_drain: Duration::from_millis(500),
        }
    }
}

impl From<&sm_config::ProcessConfig> for InstanceOptions {
    fn from(config: &sm_config::ProcessConfig) -> Self {
        Self {
            tail_lines: config.output_tail_lines,
            output_drain: config.output_drain(),
        }
    }
}

/// Live instance as tracked by the registry.
#[derive(Debug)]
pub struct InstanceHandle {
    id: u64,
    pid: Option<u32>,
    spec: Arc<Spec>,
    command_line: CommandLine,
    tail: VecDeque<String>,
    tail_capacity: usize,
    stop_tx: Option<oneshot::Sender<()>>,
    done_rx: oneshot::Receiver<Option<ExitStatus>>,
}

impl InstanceHandle {
    /// Launch `spec`. `id` tags every event this instance reports.
    pub fn spawn(
        spec: Arc<Spec>,
        id: u64,
        events: mpsc::Sender<InstanceEvent>,
        options: &InstanceOptions,
    ) -> SupervisorResult<Self> {
        let command_line = CommandLine::build(&spec);
        let program = program_path(&spec, &command_line);

        let pipe_error =
            |e| SupervisorError::io(format!("create the output pipe of '{}'", spec.name()), e);
        let (output, stdout) = std::io::pipe().map_err(pipe_error)?;
        let stderr = stdout.try_clone().map_err(pipe_error)?;

        // The command, and with it our copies of the write ends, is dropped at
        // the end of this statement; the reader sees EOF once the child exits.
        let child = Command::new(&program)
            .args(command_line.args())
            .current_dir(spec.cwd())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|e| SupervisorError::spawn(spec.name(), &program.display().to_string(), e))?;

        let pid = child.id();
        let name = spec.name().to_string();

        let output = pipe::Receiver::from_owned_fd(OwnedFd::from(output)).map_err(pipe_error)?;
        let reader = tokio::spawn(forward_lines(name.clone(), id, output, events.clone()));

        let (stop_tx, stop_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(watch(Watch {
            name,
            id,
            child,
            reader,
            events,
            stop_rx,
            done_tx,
            drain: options.output_drain,
        }));

        Ok(Self {
            id,
            pid,
            spec,
            command_line,
            tail: VecDeque::with_capacity(options.tail_lines),
            tail_capacity: options.tail_lines,
            stop_tx: Some(stop_tx),
            done_rx,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn spec(&self) -> &Arc<Spec> {
        &self.spec
    }

    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// Remember an output line for a later crash report.
    pub fn record_output(&mut self, line: &str) {
        if self.tail_capacity == 0 {
            return;
        }
        if self.tail.len() == self.tail_capacity {
            self.tail.pop_front();
        }
        self.tail.push_back(line.to_string());
    }

    /// Most recent output lines, oldest first.
    pub fn tail(&self) -> impl Iterator<Item = &str> {
        self.tail.iter().map(String::as_str)
    }

    /// Send SIGTERM and wait for the process to exit. No kill escalation.
    ///
    /// Dropping a handle without calling `stop` terminates the process too,
    /// without waiting.
    ///
    /// Returns the exit status, or `None` if it could not be observed.
    pub async fn stop(mut self) -> Option<ExitStatus> {
        if let Some(stop_tx) = self.stop_tx.take() {
            // Fails only if the process already exited; its status is still
            // delivered below.
            let _ = stop_tx.send(());
        }

        self.done_rx.await.ok().flatten()
    }
}

struct Watch {
    name: String,
    id: u64,
    child: Child,
    reader: JoinHandle<()>,
    events: mpsc::Sender<InstanceEvent>,
    stop_rx: oneshot::Receiver<()>,
    done_tx: oneshot::Sender<Option<ExitStatus>>,
    drain: Duration,
}

async fn watch(mut w: Watch) {
    let (status, stop_requested) = tokio::select! {
        status = w.child.wait() => (status, false),
        _ = &mut w.stop_rx => {
            if let Some(pid) = w.child.id()
                && let Err(e) = terminate(&w.name, pid)
            {
                warn!("{e}");
            }
            (w.child.wait().await, true)
        }
    };

    let status = match status {
        Ok(status) => Some(status),
        Err(e) => {
            warn!("Failed to wait for '{}': {e}", w.name);
            None
        }
    };

    // Pipes may stay open if the process left children behind.
    if tokio::time::timeout(w.drain, &mut w.reader).await.is_err() {
        debug!("Output of '{}' still open after exit, detaching", w.name);
        w.reader.abort();
    }

    if !stop_requested {
        let _ = w
            .events
            .send(InstanceEvent::Exited {
                name: w.name,
                id: w.id,
                status,
            })
            .await;
    }

    let _ = w.done_tx.send(status);
}

fn terminate(name: &str, pid: u32) -> SupervisorResult<()> {
    let raw = i32::try_from(pid).map_err(|_| SupervisorError::terminate(name, pid, Errno::EINVAL))?;

    match kill(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(SupervisorError::terminate(name, pid, e)),
    }
}

async fn forward_lines(
    name: String,
    id: u64,
    output: pipe::Receiver,
    events: mpsc::Sender<InstanceEvent>,
) {
    let mut reader = BufReader::new(output);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                let event = InstanceEvent::Output {
                    name: name.clone(),
                    id,
                    line,
                };
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Stopped reading output of '{name}': {e}");
                break;
            }
        }
    }
}

/// Executable to launch. A relative path containing a separator is taken
/// relative to the instance's working directory.
fn program_path(spec: &Spec, command_line: &CommandLine) -> PathBuf {
    let program = PathBuf::from(command_line.program());

    match command_line {
        CommandLine::Direct { .. } if program.is_relative() && program.components().count() > 1 => {
            spec.cwd().join(program)
        }
        _ => program,
    }
}
