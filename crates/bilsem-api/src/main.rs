//! API server binary for the BilsemC2 platform.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `bilsem-config.yaml` (env overrides apply)
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` when configured, else enter demo mode
//! 4. Run pending migrations
//! 5. Serve the REST API until the process is terminated

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bilsem_api::{start_server, AppState};
use bilsem_core::{ConfigError, PlatformConfig};
use bilsem_db::{PostgresConfig, PostgresPool, RetryConfig};

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the server cannot bind or a fatal serve error
/// occurs. Database unavailability is not fatal: the platform degrades
/// to demo mode.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!(
        host = config.server.host,
        port = config.server.port,
        has_database = config.has_database(),
        "bilsem-api starting"
    );

    // 3. Connect to PostgreSQL when configured.
    let db = connect_database(&config).await;

    // 4. Build application state.
    let retry = RetryConfig::new(
        config.database.retry.attempts,
        config.database.retry.base_delay_ms,
        config.database.retry.max_delay_ms,
    );
    let state = Arc::new(AppState::new(db, retry));

    // 5. Serve until terminated.
    start_server(&config.server, state).await?;

    Ok(())
}

/// Load configuration from the path in `BILSEM_CONFIG`, falling back to
/// `bilsem-config.yaml`, falling back to defaults when no file exists.
fn load_config() -> Result<PlatformConfig, ConfigError> {
    let path = std::env::var("BILSEM_CONFIG")
        .unwrap_or_else(|_| String::from("bilsem-config.yaml"));
    let path = Path::new(&path);

    if path.exists() {
        PlatformConfig::from_file(path)
    } else {
        // Defaults plus env overrides; DATABASE_URL alone is enough to
        // leave demo mode.
        PlatformConfig::parse("")
    }
}

/// Connect the pool and run migrations, degrading to demo mode on failure.
async fn connect_database(config: &PlatformConfig) -> Option<PostgresPool> {
    let url = config.database.url.as_deref()?;

    let pg_config =
        PostgresConfig::new(url).with_max_connections(config.database.max_connections);

    match PostgresPool::connect(&pg_config).await {
        Ok(pool) => {
            if let Err(error) = pool.run_migrations().await {
                warn!(%error, "Migrations failed, continuing with existing schema");
            }
            Some(pool)
        }
        Err(error) => {
            warn!(%error, "Database connection failed, entering demo mode");
            None
        }
    }
}
