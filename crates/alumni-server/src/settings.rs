//! Server settings.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! 1. Built-in defaults
//! 2. `config/alumni.{toml,yaml,json}` (optional)
//! 3. `ALUMNI__`-prefixed environment variables, e.g.
//!    `ALUMNI__SERVER__PORT=9090` or `ALUMNI__CACHE__NAMESPACES__VERIFY__TTL_MS=60000`

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alumni_cache::{NamespaceConfig, SweepConfig};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::services::default_namespaces;

/// Default location of the optional settings file, without extension.
pub const DEFAULT_SETTINGS_FILE: &str = "config/alumni";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Host and port do not form a socket address.
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    /// A namespace configuration is not usable.
    #[error("invalid configuration for cache namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },
}

/// Complete server settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub directory: DirectorySettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// Direccion de escucha.
    pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| SettingsError::InvalidAddress(addr))
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds between sweeps of dead entries.
    pub sweep_interval_secs: u64,
    /// Per-namespace configuration, keyed by namespace name.
    pub namespaces: BTreeMap<String, NamespaceConfig>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 300,
            namespaces: default_namespaces(),
        }
    }
}

impl CacheSettings {
    /// Sweep scheduler configuration.
    pub fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            interval: Duration::from_secs(self.sweep_interval_secs),
        }
    }
}

/// Student directory settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// YAML or JSON file with the initial student records.
    pub seed_file: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from defaults, `config/alumni.*` and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::build(File::with_name(DEFAULT_SETTINGS_FILE).required(false))
    }

    /// Loads settings using `path` as the settings file (must exist).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::build(File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, SettingsError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("ALUMNI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.server.addr()?;

        if self.cache.sweep_interval_secs == 0 {
            return Err(SettingsError::InvalidNamespace {
                namespace: "*".to_string(),
                reason: "sweep_interval_secs must be greater than zero".to_string(),
            });
        }

        for (name, config) in &self.cache.namespaces {
            config
                .validate()
                .map_err(|e| SettingsError::InvalidNamespace {
                    namespace: name.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}
