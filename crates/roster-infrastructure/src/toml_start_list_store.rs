use crate::paths::{RosterPaths, ServiceType};
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use roster_core::error::{Result, RosterError};
use roster_core::model::StartList;
use roster_core::storage::StartListStore;
use std::path::PathBuf;

/// Persists the start list in `startlist.toml`.
pub struct TomlStartListStore {
    file: AtomicTomlFile<StartList>,
}

impl TomlStartListStore {
    pub fn new(paths: &RosterPaths) -> Result<Self> {
        let path = paths
            .get_path(ServiceType::StartList)
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
impl StartListStore for TomlStartListStore {
    async fn load(&self) -> Result<StartList> {
        let start_list = self.file.load()?.unwrap_or_default();
        tracing::debug!(starts = start_list.list.len(), "Loaded start list");
        Ok(start_list)
    }

    async fn save(&self, start_list: &StartList) -> Result<()> {
        self.file.save(start_list)
    }
}
