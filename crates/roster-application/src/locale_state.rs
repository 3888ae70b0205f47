//! Persisted display language, independent of the session.

use roster_core::error::Result;
use roster_core::preferences::{Locale, Preferences};
use roster_core::storage::PreferenceStore;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct LocaleState {
    store: Arc<dyn PreferenceStore>,
    preferences: RwLock<Preferences>,
}

impl LocaleState {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            preferences: RwLock::new(Preferences::default()),
        }
    }

    pub async fn restore(&self) -> Result<()> {
        let preferences = self.store.load().await?;
        tracing::debug!(locale = %preferences.locale, "Restoring preferences");
        *self.preferences.write().await = preferences;
        Ok(())
    }

    pub async fn locale(&self) -> Locale {
        self.preferences.read().await.locale
    }

    /// Persists first; the in-memory locale only changes once the write succeeded.
    pub async fn set_locale(&self, locale: Locale) -> Result<()> {
        let mut updated = self.preferences.read().await.clone();
        updated.locale = locale;
        self.store.save(&updated).await?;
        *self.preferences.write().await = updated;
        tracing::info!(%locale, "Locale changed");
        Ok(())
    }
}
