//! Per-namespace cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Configuracion de un namespace del cache.
///
/// Durations are read and written as milliseconds (`ttl_ms`, `stale_ms`) so
/// namespaces can be declared directly in the server configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Tiempo durante el cual una entry es fresh (default: 5 minutos)
    #[serde(rename = "ttl_ms", with = "millis", default = "default_ttl")]
    pub ttl: Duration,
    /// Ventana adicional durante la cual una entry es stale (default: 0)
    #[serde(rename = "stale_ms", with = "millis", default)]
    pub stale_window: Duration,
    /// Maximo numero de entries (default: 10000)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_ttl() -> Duration {
    Duration::from_secs(300)
}

fn default_max_entries() -> usize {
    10_000
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            stale_window: Duration::ZERO,
            max_entries: default_max_entries(),
        }
    }
}

impl NamespaceConfig {
    /// Creates a configuration with the given TTL and defaults elsewhere.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    /// Sets the stale window served while a background refresh runs.
    pub fn with_stale_window(mut self, stale_window: Duration) -> Self {
        self.stale_window = stale_window;
        self
    }

    /// Sets the maximum number of entries kept at rest.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Returns true if stale entries can be served.
    pub fn serves_stale(&self) -> bool {
        !self.stale_window.is_zero()
    }

    /// Checks that the configuration can back a namespace.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "ttl must be greater than zero".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_config_default() {
        let config = NamespaceConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.stale_window, Duration::ZERO);
        assert_eq!(config.max_entries, 10_000);
        assert!(!config.serves_stale());
    }

    #[test]
    fn test_builder_methods() {
        let config = NamespaceConfig::new(Duration::from_millis(100))
            .with_stale_window(Duration::from_millis(200))
            .with_max_entries(2);

        assert_eq!(config.ttl, Duration::from_millis(100));
        assert_eq!(config.stale_window, Duration::from_millis(200));
        assert_eq!(config.max_entries, 2);
        assert!(config.serves_stale());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(NamespaceConfig::default().validate().is_ok());
        assert!(
            NamespaceConfig::new(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            NamespaceConfig::default()
                .with_max_entries(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_deserialize_from_millis() {
        let config: NamespaceConfig =
            serde_json::from_str(r#"{"ttl_ms": 60000, "stale_ms": 1500, "max_entries": 50}"#)
                .unwrap();

        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.stale_window, Duration::from_millis(1500));
        assert_eq!(config.max_entries, 50);
    }

    #[test]
    fn test_deserialize_uses_defaults() {
        let config: NamespaceConfig = serde_json::from_str(r#"{"ttl_ms": 1000}"#).unwrap();

        assert_eq!(config.stale_window, Duration::ZERO);
        assert_eq!(config.max_entries, 10_000);
    }
}
