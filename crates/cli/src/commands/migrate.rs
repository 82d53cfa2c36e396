//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! td-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for storefront
//!   (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Storefront migrations: `crates/storefront/migrations/`

use thiserror::Error;
use tracing::info;

use tindahan_storefront::ConfigError;
use tindahan_storefront::config::StorefrontConfig;
use tindahan_storefront::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    let config = StorefrontConfig::from_env()?;

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&config).await?;

    info!(
        migrations = db::MIGRATOR.iter().count(),
        "Running storefront migrations..."
    );
    db::run_migrations(&pool).await?;

    info!("Storefront migrations complete");
    Ok(())
}
