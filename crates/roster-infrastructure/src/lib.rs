//! Infrastructure layer of the roster client: durable storage, path
//! management and configuration loading.

pub mod config_service;
pub mod paths;
pub mod storage;
pub mod toml_preference_store;
pub mod toml_session_store;
pub mod toml_start_list_store;

pub use crate::config_service::ConfigService;
pub use crate::paths::RosterPaths;
pub use crate::toml_preference_store::TomlPreferenceStore;
pub use crate::toml_session_store::TomlSessionStore;
pub use crate::toml_start_list_store::TomlStartListStore;
