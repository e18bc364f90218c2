use crate::{
    CONFIG_PATH_ENV, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_FILENAME, LoggingConfig,
    ProcessConfig, SupervisorConfig, build_fleet,
};

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use sm_core::Fleet;
use toml::Table;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub supervisor: SupervisorConfig,
    pub logging: LoggingConfig,
    pub process: ProcessConfig,
    /// Server-type templates, keyed by name prefix
    pub templates: Table,
    /// Fleet entries, in declaration order
    pub servers: Vec<Table>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Load `.env` if present
    /// 2. Use `path`, else SM_CONFIG, else ./server-manager.toml
    /// 3. A missing default file yields defaults; a missing explicit file is an error
    /// 4. Apply SM_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load(path: Option<&Path>) -> ConfigErrorResult<Self> {
        let _ = dotenvy::dotenv();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load_file(&path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if path.exists() {
                    Self::load_file(&path)?
                } else {
                    warn!(
                        "No {} in the current directory, using defaults",
                        DEFAULT_CONFIG_FILENAME
                    );
                    Config::default()
                }
            }
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse one TOML file, without environment overrides.
    pub fn load_file(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;

        let absolute = std::path::absolute(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.source = Some(absolute);

        Ok(config)
    }

    /// File this configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory relative `cwd` fields resolve against: the directory of the
    /// configuration file, else the current directory.
    pub fn base_dir(&self) -> ConfigErrorResult<PathBuf> {
        if let Some(parent) = self.source.as_deref().and_then(Path::parent) {
            return Ok(parent.to_path_buf());
        }

        std::env::current_dir().map_err(|e| ConfigError::current_dir(e))
    }

    /// Journal directory, resolved against the base directory.
    pub fn log_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(self.base_dir()?.join(&self.logging.dir))
    }

    /// Build the fleet snapshot described by this configuration.
    pub fn fleet(&self) -> ConfigErrorResult<Fleet> {
        build_fleet(&self.templates, &self.servers, &self.base_dir()?)
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.supervisor.validate()?;
        self.logging.validate()?;
        self.process.validate()?;

        for (name, _) in &self.templates {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid("templates", "template names must not be empty"));
            }
        }

        // Entry lookups (missing, duplicate) are checked at start time.
        self.fleet()?;

        Ok(())
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        match &self.source {
            Some(path) => info!("  file: {}", path.display()),
            None => info!("  file: <defaults>"),
        }
        info!(
            "  supervisor: {} (read timeout {}s)",
            self.supervisor.bind_addr(),
            self.supervisor.read_timeout_secs
        );
        info!(
            "  logging: {} (colored: {}), journal in {}/ rotated every {}s",
            *self.logging.level,
            self.logging.colored,
            self.logging.dir,
            self.logging.rotation_secs
        );
        info!(
            "  process: tail={} lines, drain={}ms",
            self.process.output_tail_lines, self.process.output_drain_ms
        );
        info!(
            "  fleet: {} template(s), {} server(s)",
            self.templates.len(),
            self.servers.len()
        );
    }

    fn apply_env_overrides(&mut self) {
        // Supervisor
        Self::apply_env_string("SM_HOST", &mut self.supervisor.host);
        Self::apply_env_parse("SM_PORT", &mut self.supervisor.port);
        Self::apply_env_parse(
            "SM_READ_TIMEOUT_SECS",
            &mut self.supervisor.read_timeout_secs,
        );

        // Logging
        Self::apply_env_parse("SM_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("SM_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_bool("SM_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_parse("SM_LOG_ROTATION_SECS", &mut self.logging.rotation_secs);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
