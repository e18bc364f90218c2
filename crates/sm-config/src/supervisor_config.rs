use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_SECS,
    MAX_READ_TIMEOUT_SECS, MIN_PORT, MIN_READ_TIMEOUT_SECS,
};

use std::time::Duration;

use serde::Deserialize;

/// Control port settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub host: String,
    pub port: u16,
    /// How long a control connection may take to send its command line
    pub read_timeout_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid("supervisor.host", "must not be empty"));
        }

        // Port 0 lets the OS pick one.
        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::invalid(
                "supervisor.port",
                format!("must be 0 (auto) or >= {}, got {}", MIN_PORT, self.port),
            ));
        }

        if !(MIN_READ_TIMEOUT_SECS..=MAX_READ_TIMEOUT_SECS).contains(&self.read_timeout_secs) {
            return Err(ConfigError::invalid(
                "supervisor.read_timeout_secs",
                format!(
                    "must be {}-{}, got {}",
                    MIN_READ_TIMEOUT_SECS, MAX_READ_TIMEOUT_SECS, self.read_timeout_secs
                ),
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
