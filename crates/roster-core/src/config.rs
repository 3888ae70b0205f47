use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/reservation";
pub const DEFAULT_MEMBERS_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_DEV_ACCOUNT_ID: &str = "dev";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration of the client, stored in `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the reservation API (login, calendar, day, @me, reservations).
    pub api_base_url: String,
    /// Base URL the member directory is served under.
    pub members_base_url: String,
    /// Whether login caches username/password for silent re-login.
    pub remember_credentials: bool,
    /// Identity id of the internal test account; toggles the dev flag in the UI.
    pub dev_account_id: String,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            members_base_url: DEFAULT_MEMBERS_BASE_URL.to_string(),
            remember_credentials: false,
            dev_account_id: DEFAULT_DEV_ACCOUNT_ID.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
