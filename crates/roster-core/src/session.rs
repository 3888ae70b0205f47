//! Session domain models.

use crate::model::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The in-memory authentication state of the client.
///
/// `token` is either empty or a non-empty opaque bearer string. `identity`
/// is only populated after a successful "who am I" fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn clear(&mut self) {
        self.token.clear();
        self.identity = None;
    }
}

/// Cached username/password, used only for silent re-login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps passwords out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What survives a restart of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.credentials.is_none()
    }
}

/// Authentication status published to observers such as the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticated,
}
