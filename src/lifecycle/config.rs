//! Application settings.
//!
//! Resolution order, later wins:
//! 1. [`Settings::default`]
//! 2. `store-crud.toml` in the working directory, if present
//! 3. `STORE_CRUD__*` environment variables

use super::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "store-crud.toml";
pub const ENV_PREFIX: &str = "STORE_CRUD__";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root that every endpoint template is resolved against.
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Capacity of the bus request channel and of each handler queue.
    pub bus_buffer_size: usize,
    /// How far a slow event subscriber may fall behind before it lags.
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            request_timeout_secs: 30,
            bus_buffer_size: 32,
            event_capacity: 256,
        }
    }
}

impl Settings {
    /// Loads settings from `store-crud.toml` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE), |key| std::env::var(key).ok())
    }

    /// Loads settings from `path` (missing file is fine) and the given variable lookup.
    pub fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        settings.apply_env(env)?;
        Ok(settings)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = env(&format!("{ENV_PREFIX}BASE_URL")) {
            self.base_url = v;
        }
        if let Some(v) = parsed(&env, "REQUEST_TIMEOUT_SECS")? {
            self.request_timeout_secs = v;
        }
        if let Some(v) = parsed(&env, "BUS_BUFFER_SIZE")? {
            self.bus_buffer_size = v;
        }
        if let Some(v) = parsed(&env, "EVENT_CAPACITY")? {
            self.event_capacity = v;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parsed<T: FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    let key = format!("{ENV_PREFIX}{name}");
    match env(&key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
