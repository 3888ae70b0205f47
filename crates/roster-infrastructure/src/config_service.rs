//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml` and applies environment
//! overrides. Configuration priority: environment variables > config.toml >
//! built-in defaults.

use crate::paths::{RosterPaths, ServiceType};
use crate::storage::AtomicTomlFile;
use roster_core::config::ClientConfig;
use roster_core::error::{Result, RosterError};
use std::env;
use std::sync::{Arc, RwLock};

pub const ENV_API_BASE_URL: &str = "ROSTER_API_BASE_URL";
pub const ENV_MEMBERS_BASE_URL: &str = "ROSTER_MEMBERS_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "ROSTER_LOG_LEVEL";

/// Configuration service that loads and caches the client configuration.
#[derive(Clone)]
pub struct ConfigService {
    paths: RosterPaths,
    /// Cached configuration, loaded on first access.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: RosterPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| RosterError::internal("config cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = apply_overrides(self.load_file()?, |key| env::var(key).ok());

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| RosterError::internal("config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let path = self
            .paths
            .get_path(ServiceType::Config)
            .map_err(|e| RosterError::config(e.to_string()))?;
        let file = AtomicTomlFile::<ClientConfig>::new(path);
        match file.load()? {
            Some(config) => Ok(config),
            None => {
                tracing::debug!(path = %file.path().display(), "No config file, using defaults");
                Ok(ClientConfig::default())
            }
        }
    }
}

/// Applies environment overrides on top of the file configuration.
fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL) {
        config.api_base_url = url;
    }
    if let Some(url) = lookup(ENV_MEMBERS_BASE_URL) {
        config.members_base_url = url;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.log_level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::config::DEFAULT_API_BASE_URL;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(RosterPaths::new(Some(temp_dir.path().to_path_buf())));
        let config = service.load_file().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_file_values_are_read_and_cached() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "dev_account_id = \"tester\"\nremember_credentials = true\n",
        )
        .unwrap();
        let service = ConfigService::new(RosterPaths::new(Some(temp_dir.path().to_path_buf())));

        let config = service.load_file().unwrap();
        assert_eq!(config.dev_account_id, "tester");
        assert!(config.remember_credentials);

        let first = service.get_config().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "dev_account_id = \"other\"\n").unwrap();
        assert_eq!(service.get_config().unwrap(), first);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().dev_account_id, "other");
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> = [
            (ENV_API_BASE_URL, "https://roster.example.org/api/reservation"),
            (ENV_LOG_LEVEL, "debug"),
        ]
        .into_iter()
        .collect();

        let config = apply_overrides(ClientConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });
        assert_eq!(config.api_base_url, "https://roster.example.org/api/reservation");
        assert_eq!(config.log_level, "debug");
        assert_ne!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
