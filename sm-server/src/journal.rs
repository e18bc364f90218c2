//! The supervisor's own rotating event log.
//!
//! Files are named `supervisor-<timestamp>.log` inside the journal directory.
//! A file is replaced `rotation` after it was opened, independent of the
//! calendar. Every line is mirrored to the `log` facade at debug level.

use crate::{Result as SupervisorResult, SupervisorError};

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Local;
use log::debug;
use tokio::time::Instant;

pub const JOURNAL_PREFIX: &str = "supervisor-";
pub const JOURNAL_EXTENSION: &str = "log";

pub struct Journal {
    dir: PathBuf,
    path: PathBuf,
    file: File,
    opened_at: Instant,
    rotation: Duration,
}

impl Journal {
    /// Create the directory if needed and open a fresh journal file.
    pub fn open(dir: impl Into<PathBuf>, rotation: Duration) -> SupervisorResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| SupervisorError::journal(&dir, e))?;

        let (path, file) = Self::create_file(&dir)?;

        Ok(Self {
            dir,
            path,
            file,
            opened_at: Instant::now(),
            rotation,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the current file must be replaced.
    pub fn deadline(&self) -> Instant {
        self.opened_at + self.rotation
    }

    /// Append one timestamped line.
    pub fn write(&mut self, message: &str) -> SupervisorResult<()> {
        debug!("{message}");

        writeln!(
            self.file,
            "[{}] {}",
            humantime::format_rfc3339_seconds(SystemTime::now()),
            message
        )
        .and_then(|()| self.file.flush())
        .map_err(|e| SupervisorError::journal(&self.path, e))
    }

    /// Append a line written by the instance `name`.
    pub fn output(&mut self, name: &str, line: &str) -> SupervisorResult<()> {
        self.write(&format!("[{name}] {line}"))
    }

    /// Close the current file and continue in a new one.
    pub fn rotate(&mut self) -> SupervisorResult<&Path> {
        let (path, file) = Self::create_file(&self.dir)?;
        self.write(&format!("Journal continues in {}", path.display()))?;

        let previous = std::mem::replace(&mut self.path, path);
        self.file = file;
        self.opened_at = Instant::now();
        self.write(&format!("Journal continued from {}", previous.display()))?;

        Ok(&self.path)
    }

    fn create_file(dir: &Path) -> SupervisorResult<(PathBuf, File)> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();

        // Two rotations within one second must not share a file.
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{JOURNAL_PREFIX}{stamp}.{JOURNAL_EXTENSION}"),
                n => format!("{JOURNAL_PREFIX}{stamp}-{n}.{JOURNAL_EXTENSION}"),
            };
            let path = dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(SupervisorError::journal(&path, e)),
            }
        }
    }
}
