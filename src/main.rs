//! Authgate server binary
//!
//! Bootstraps configuration, logging, and the SQLite store, then serves
//! the authentication API until the process receives a shutdown signal.

use authgate::{api, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Config problems go to stderr; the logger is not up yet
    let config = core::config::Config::load().map_err(|e| {
        eprintln!("configuration error: {}", e);
        e
    })?;

    let _logger = core::Logger::init(&config.logging).map_err(|e| {
        eprintln!("logging setup failed: {}", e);
        e
    })?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting authgate");
    info!(
        host = %config.server.host,
        port = config.server.port,
        database = %config.database.path.display(),
        "Configuration loaded"
    );

    if config.security.jwt_secret == "change-this-secret-in-production" {
        warn!("security.jwt_secret is still the default; session tokens are forgeable until it is changed");
    }

    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size as u32,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    info!("Database ready");

    let server = api::ApiServer::new(&config, db);
    server.serve().await?;

    Ok(())
}
