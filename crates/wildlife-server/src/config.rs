//! Server configuration
//!
//! Defaults overlaid by `WILDLIFE_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage::{RetryPolicy, StoreSettings};

const ENV_PREFIX: &str = "WILDLIFE";

/// Which document store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/wildlife.db`
    pub database_path: Option<String>,
    pub store: StoreKind,
    pub collection: String,
    pub max_connect_attempts: u32,
    pub retry_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub ping_timeout_ms: u64,
    pub operation_timeout_ms: u64,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("data_dir", "/opt/wildlife/data")?
            .set_default("store", "sqlite")?
            .set_default("collection", "wildlife_sightings")?
            .set_default("max_connect_attempts", 3i64)?
            .set_default("retry_delay_ms", 2000i64)?
            .set_default("connect_timeout_ms", 30_000i64)?
            .set_default("ping_timeout_ms", 5000i64)?
            .set_default("operation_timeout_ms", 45_000i64)?
            .set_default("max_connections", 5i64)?
            .set_default("body_limit_bytes", 10 * 1024 * 1024i64)?
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn database_path(&self) -> String {
        self.database_path.clone().unwrap_or_else(|| {
            self.data_dir
                .join("wildlife.db")
                .to_string_lossy()
                .to_string()
        })
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            retry: RetryPolicy {
                max_attempts: self.max_connect_attempts,
                delay: Duration::from_millis(self.retry_delay_ms),
            },
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            ping_timeout: Duration::from_millis(self.ping_timeout_ms),
            operation_timeout: Duration::from_millis(self.operation_timeout_ms),
            max_connections: self.max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_environment(
            config::Environment::with_prefix(ENV_PREFIX).source(Some(source)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3001");
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.collection, "wildlife_sightings");
        assert_eq!(config.database_path(), "/opt/wildlife/data/wildlife.db");

        let store = config.store_settings();
        assert_eq!(store.retry.max_attempts, 3);
        assert_eq!(store.retry.delay, Duration::from_secs(2));
        assert_eq!(store.ping_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_with(&[
            ("WILDLIFE_BIND_ADDRESS", "127.0.0.1:8080"),
            ("WILDLIFE_STORE", "memory"),
            ("WILDLIFE_MAX_CONNECT_ATTEMPTS", "5"),
            ("WILDLIFE_DATABASE_PATH", "/tmp/sightings.db"),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.max_connect_attempts, 5);
        assert_eq!(config.database_path(), "/tmp/sightings.db");
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        assert!(load_with(&[("WILDLIFE_STORE", "mongodb")]).is_err());
    }
}
