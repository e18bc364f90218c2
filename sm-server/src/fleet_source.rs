//! Where RELOAD reads the fleet definition from.

use crate::{Result as SupervisorResult, SupervisorError};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sm_config::Config;
use sm_core::Fleet;

pub trait FleetSource: Send {
    /// Read a fresh fleet snapshot.
    fn load(&self) -> SupervisorResult<Fleet>;

    /// Where the fleet comes from, for log lines.
    fn describe(&self) -> String;
}

/// Reads the `[templates]`/`[[servers]]` sections of a configuration file.
#[derive(Debug, Clone)]
pub struct TomlFleetSource {
    path: PathBuf,
}

impl TomlFleetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FleetSource for TomlFleetSource {
    fn load(&self) -> SupervisorResult<Fleet> {
        let config = Config::load_file(&self.path)?;
        Ok(config.fleet()?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory source whose content can be swapped through any clone.
#[derive(Debug, Clone)]
pub struct MemoryFleetSource {
    state: Arc<Mutex<Result<Fleet, String>>>,
}

impl MemoryFleetSource {
    pub fn new(fleet: Fleet) -> Self {
        Self {
            state: Arc::new(Mutex::new(Ok(fleet))),
        }
    }

    /// Serve `fleet` on the next load.
    pub fn replace(&self, fleet: Fleet) {
        self.set(Ok(fleet));
    }

    /// Make the next load fail with `reason`.
    pub fn fail(&self, reason: impl Into<String>) {
        self.set(Err(reason.into()));
    }

    fn set(&self, state: Result<Fleet, String>) {
        match self.state.lock() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }
}

impl FleetSource for MemoryFleetSource {
    fn load(&self) -> SupervisorResult<Fleet> {
        let guard = self
            .state
            .lock()
            .map_err(|_| SupervisorError::fleet_source("fleet state lock poisoned"))?;

        guard.clone().map_err(SupervisorError::fleet_source)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
