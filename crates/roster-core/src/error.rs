//! Error types for the roster client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the backend uses to reject a missing, invalid or expired token.
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// A shared error type for the entire roster client.
///
/// The first four variants form the taxonomy the session layer reacts to;
/// the remaining ones cover local storage and configuration failures.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterError {
    /// No token is present although the operation requires one.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The backend rejected the bearer token.
    #[error("Unauthorized: the session token was rejected")]
    Unauthorized,

    /// The transport failed (timeout, DNS, connection refused).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status other than 401.
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Malformed input or a violated precondition.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Durable client storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an error from a rejected HTTP response.
    ///
    /// A 401 always becomes [`RosterError::Unauthorized`] since that status is
    /// the only signal the silent re-login policy keys on.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        if status == STATUS_UNAUTHORIZED {
            Self::Unauthorized
        } else {
            Self::Remote {
                status,
                message: message.into(),
            }
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(STATUS_UNAUTHORIZED),
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RosterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for RosterError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RosterError>`.
pub type Result<T> = std::result::Result<T, RosterError>;
