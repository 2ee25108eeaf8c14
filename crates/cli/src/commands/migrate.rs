//! Session-table migration.
//!
//! The storefront's only local table is the tower-sessions store; its
//! schema ships with the session crate, so migration is one call.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use spotfit_storefront::config::{ConfigError, StorefrontConfig};
use spotfit_storefront::db;

/// Errors running the migration.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the session table.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the database is
/// unreachable.
pub async fn run() -> Result<(), MigrateError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migration complete");
    Ok(())
}
