mod config;
mod error;
mod fleet_config;
mod log_level;
mod logging_config;
mod process_config;
mod supervisor_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use fleet_config::build_fleet;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use process_config::ProcessConfig;
pub use supervisor_config::SupervisorConfig;

/// Configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "server-manager.toml";
/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "SM_CONFIG";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 20000;
const MIN_PORT: u16 = 1024;

const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;
const MIN_READ_TIMEOUT_SECS: u64 = 1;
const MAX_READ_TIMEOUT_SECS: u64 = 3600;

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_LOG_COLORED: bool = true;

const DEFAULT_ROTATION_SECS: u64 = 86_400;
const MIN_ROTATION_SECS: u64 = 60;
const MAX_ROTATION_SECS: u64 = 30 * 86_400;

const DEFAULT_OUTPUT_TAIL_LINES: usize = 20;
const MAX_OUTPUT_TAIL_LINES: usize = 10_000;
const DEFAULT_OUTPUT_DRAIN_MS: u64 = 500;
const MAX_OUTPUT_DRAIN_MS: u64 = 60_000;
