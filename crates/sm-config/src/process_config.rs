use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_OUTPUT_DRAIN_MS, DEFAULT_OUTPUT_TAIL_LINES,
    MAX_OUTPUT_DRAIN_MS, MAX_OUTPUT_TAIL_LINES,
};

use std::time::Duration;

use serde::Deserialize;

/// Supervised child process settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Lines of recent output kept per instance for crash reports
    pub output_tail_lines: usize,
    /// How long to wait for buffered output after a child exits
    pub output_drain_ms: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            output_tail_lines: DEFAULT_OUTPUT_TAIL_LINES,
            output_drain_ms: DEFAULT_OUTPUT_DRAIN_MS,
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.output_tail_lines > MAX_OUTPUT_TAIL_LINES {
            return Err(ConfigError::invalid(
                "process.output_tail_lines",
                format!("must be <= {}, got {}", MAX_OUTPUT_TAIL_LINES, self.output_tail_lines),
            ));
        }

        if self.output_drain_ms > MAX_OUTPUT_DRAIN_MS {
            return Err(ConfigError::invalid(
                "process.output_drain_ms",
                format!("must be <= {}, got {}", MAX_OUTPUT_DRAIN_MS, self.output_drain_ms),
            ));
        }

        Ok(())
    }

    pub fn output_drain(&self) -> Duration {
        Duration::from_millis(self.output_drain_ms)
    }
}
