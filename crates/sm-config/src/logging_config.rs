use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_LOG_COLORED, DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_LEVEL,
    DEFAULT_ROTATION_SECS, LogLevel, MAX_ROTATION_SECS, MIN_ROTATION_SECS,
};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Directory holding the journal files
    pub dir: String,
    pub colored: bool,
    /// Journal rotation period, counted from when the current file was opened
    pub rotation_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            dir: String::from(DEFAULT_LOG_DIRECTORY),
            colored: DEFAULT_LOG_COLORED,
            rotation_secs: DEFAULT_ROTATION_SECS,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.dir.trim().is_empty() {
            return Err(ConfigError::invalid("logging.dir", "must not be empty"));
        }

        if !(MIN_ROTATION_SECS..=MAX_ROTATION_SECS).contains(&self.rotation_secs) {
            return Err(ConfigError::invalid(
                "logging.rotation_secs",
                format!(
                    "must be {}-{}, got {}",
                    MIN_ROTATION_SECS, MAX_ROTATION_SECS, self.rotation_secs
                ),
            ));
        }

        Ok(())
    }

    pub fn rotation(&self) -> Duration {
        Duration::from_secs(self.rotation_secs)
    }
}
