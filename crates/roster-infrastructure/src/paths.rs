//! Unified path management for roster client files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/roster/            # Config directory (platform default)
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Token and cached credentials
//! └── preferences.toml         # Locale and other user preferences
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "roster";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// The files the client persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Session,
    Preferences,
    StartList,
}

impl ServiceType {
    fn file_name(&self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::Session => "session.toml",
            ServiceType::Preferences => "preferences.toml",
            ServiceType::StartList => "startlist.toml",
        }
    }
}

/// Resolves client file locations.
///
/// With `base = None` files live under the platform config directory
/// (`~/.config/roster` on Linux). A custom base is used verbatim, which keeps
/// tests and portable installs out of the user's home.
#[derive(Debug, Clone)]
pub struct RosterPaths {
    base: Option<PathBuf>,
}

impl RosterPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the roster configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the file backing the given service.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(service.file_name()))
    }
}

impl Default for RosterPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
