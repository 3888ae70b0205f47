use crate::paths::{RosterPaths, ServiceType};
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use roster_core::error::{Result, RosterError};
use roster_core::preferences::Preferences;
use roster_core::storage::PreferenceStore;
use std::path::PathBuf;

/// Persists user preferences in `preferences.toml`.
pub struct TomlPreferenceStore {
    file: AtomicTomlFile<Preferences>,
}

impl TomlPreferenceStore {
    pub fn new(paths: &RosterPaths) -> Result<Self> {
        let path = paths
            .get_path(ServiceType::Preferences)
            .map_err(|e| RosterError::storage(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

#[async_trait]
impl PreferenceStore for TomlPreferenceStore {
    async fn load(&self) -> Result<Preferences> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    async fn save(&self, preferences: &Preferences) -> Result<()> {
        self.file.save(preferences)
    }
}
