//! Durable client storage traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::StartList;
use crate::preferences::Preferences;
use crate::session::PersistedSession;

/// Persists the session token and the optional cached credentials.
///
/// Contents must survive a restart, and `clear` must remove token and
/// credentials together.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted session. A missing record yields the empty default.
    async fn load(&self) -> Result<PersistedSession>;

    async fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Removes everything written by `save`. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<()>;
}

/// Persists user preferences. Independent of the session lifecycle.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self) -> Result<Preferences>;

    async fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// Persists the start list. Like preferences it outlives the session.
#[async_trait]
pub trait StartListStore: Send + Sync {
    async fn load(&self) -> Result<StartList>;

    async fn save(&self, start_list: &StartList) -> Result<()>;
}
