//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_DB_MAX_CONNECTIONS` - Pool size ceiling (default: 10)
//! - `STOREFRONT_DB_MIN_CONNECTIONS` - Idle connections kept open (default: 2)
//! - `STOREFRONT_DB_ACQUIRE_TIMEOUT_SECS` - Wait for a free connection (default: 10)

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DATABASE_URL: &str = "STOREFRONT_DATABASE_URL";
const FALLBACK_DATABASE_URL: &str = "DATABASE_URL";
const MAX_CONNECTIONS: &str = "STOREFRONT_DB_MAX_CONNECTIONS";
const MIN_CONNECTIONS: &str = "STOREFRONT_DB_MIN_CONNECTIONS";
const ACQUIRE_TIMEOUT_SECS: &str = "STOREFRONT_DB_ACQUIRE_TIMEOUT_SECS";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Connection pool sizing
    pub pool: PoolConfig,
}

/// Connection pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a numeric
    /// setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL)
            .or_else(|| lookup(FALLBACK_DATABASE_URL))
            .filter(|url| !url.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(DATABASE_URL.to_string()))?;

        let defaults = PoolConfig::default();
        let max_connections = parse_or(&lookup, MAX_CONNECTIONS, defaults.max_connections)?;
        let min_connections = parse_or(&lookup, MIN_CONNECTIONS, defaults.min_connections)?;
        let acquire_timeout = parse_or(
            &lookup,
            ACQUIRE_TIMEOUT_SECS,
            defaults.acquire_timeout.as_secs(),
        )
        .map(Duration::from_secs)?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                MAX_CONNECTIONS.to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if min_connections > max_connections {
            return Err(ConfigError::InvalidEnvVar(
                MIN_CONNECTIONS.to_string(),
                format!("must not exceed {MAX_CONNECTIONS} ({max_connections})"),
            ));
        }

        Ok(Self {
            database_url,
            pool: PoolConfig {
                max_connections,
                min_connections,
                acquire_timeout,
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
