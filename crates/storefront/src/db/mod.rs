//! Database operations for storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `user_account` - Site accounts (username, optional email, password hash)
//! - `customer` - One profile per account with the shipping address
//! - `orders` - Checkout orders and their status stamp
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p tindahan-cli -- migrate
//! ```

pub mod customers;
pub mod orders;
pub mod users;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::StorefrontConfig;

/// Embedded storefront migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation, carrying the constraint name.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Name of the violated constraint, for `Conflict` errors.
    #[must_use]
    pub fn conflict_constraint(&self) -> Option<&str> {
        match self {
            Self::Conflict(constraint) => Some(constraint),
            _ => None,
        }
    }
}

/// Map a unique violation to `Conflict`, anything else to `Database`.
pub(crate) fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(db_err.constraint().unwrap_or("unique").to_owned());
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool from configuration.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &StorefrontConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .acquire_timeout(config.pool.acquire_timeout)
        .connect(config.database_url.expose_secret())
        .await
}

/// Run all pending storefront migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or was modified after being applied.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_embedded_in_order() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(versions.len(), 3);
        assert!(versions.windows(2).all(|w| w.first() < w.last()));
    }

    #[test]
    fn test_conflict_constraint() {
        let err = RepositoryError::Conflict("user_account_email_key".to_owned());
        assert_eq!(err.conflict_constraint(), Some("user_account_email_key"));
        assert_eq!(RepositoryError::NotFound.conflict_constraint(), None);
    }
}
