//! Wiring of configuration, logging, storage and the HTTP gateway.

use anyhow::{Context, Result};
use roster_application::RosterUseCase;
use roster_core::config::ClientConfig;
use roster_infrastructure::{
    ConfigService, RosterPaths, TomlPreferenceStore, TomlSessionStore, TomlStartListStore,
};
use roster_interaction::HttpRosterGateway;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub struct App {
    pub usecase: RosterUseCase,
}

pub async fn bootstrap(config_dir: Option<PathBuf>) -> Result<App> {
    let paths = RosterPaths::new(config_dir);
    let config = ConfigService::new(paths.clone())
        .get_config()
        .context("Failed to load configuration")?;
    init_tracing(&config);

    let session_store =
        TomlSessionStore::new(&paths).context("Failed to open session storage")?;
    let preference_store =
        TomlPreferenceStore::new(&paths).context("Failed to open preference storage")?;
    let start_list_store =
        TomlStartListStore::new(&paths).context("Failed to open start list storage")?;
    let gateway = HttpRosterGateway::from_config(&config);
    tracing::debug!(api = %config.api_base_url, "Client configured");

    let usecase = RosterUseCase::new(
        Arc::new(gateway),
        Arc::new(session_store),
        Arc::new(preference_store),
        Arc::new(start_list_store),
        &config,
    );
    usecase
        .restore()
        .await
        .context("Failed to restore persisted session")?;

    Ok(App { usecase })
}

/// Logs go to stderr so stdout stays machine readable. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
