mod fleet_config;

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

pub(crate) const FARM_TOML: &str = r##"
[supervisor]
port = 21000

[logging]
level = "debug"
dir = "journal"

[templates.compilox]
path = "./compilation-server"
cwd = "compilation-server"
"--host" = "127.0.0.1"
"--instance" = "$(name)"

[templates.experimentix]
path = "./experiment-server"
cwd = "build/bin"
"--verbose" = true
"#host" = "127.0.0.1"

[[servers]]
name = "compilox1"
"--port" = 20101

[[servers]]
name = "experimentix1"
"#port" = 20201
"##;

/// Write `contents` as the config file of a fresh temp directory.
pub(crate) fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(crate::DEFAULT_CONFIG_FILENAME);
    std::fs::write(&path, contents).unwrap();
    (temp, path)
}
