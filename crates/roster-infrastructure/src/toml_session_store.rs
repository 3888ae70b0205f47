//! TOML-backed session store.

use crate::paths::{RosterPaths, ServiceType};
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use roster_core::error::{Result, RosterError};
use roster_core::session::PersistedSession;
use roster_core::storage::SessionStore;
use std::path::PathBuf;

/// Persists the session token and cached credentials in `session.toml`.
///
/// `clear` deletes the file, so token and credentials disappear in one
/// filesystem operation.
pub struct TomlSessionStore {
    file: AtomicTomlFile<PersistedSession>,
}

impl TomlSessionStore {
    /// Creates a store at the default location (`~/.config/roster/session.toml`).
    pub fn new(paths: &RosterPaths) -> Result<Self> {
        let path = paths
            .get_path(ServiceType::Session)
            .map_err(|e| RosterError::storage(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a store backed by a custom file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

#[async_trait]
impl SessionStore for TomlSessionStore {
    async fn load(&self) -> Result<PersistedSession> {
        let session = self.file.load()?.unwrap_or_default();
        tracing::debug!(
            path = %self.file.path().display(),
            has_token = session.token.is_some(),
            has_credentials = session.credentials.is_some(),
            "Loaded persisted session"
        );
        Ok(session)
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        if session.is_empty() {
            return self.clear().await;
        }
        self.file.save(session)
    }

    async fn clear(&self) -> Result<()> {
        tracing::debug!(path = %self.file.path().display(), "Clearing persisted session");
        self.file.remove()
    }
}
