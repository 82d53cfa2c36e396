//! Integration tests for Tindahan.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database, then point the tests at it
//! export STOREFRONT_DATABASE_URL=postgres://localhost/tindahan_test
//!
//! # Run integration tests (they are ignored by default)
//! cargo test -p tindahan-integration-tests -- --ignored
//! ```
//!
//! Each test migrates the database and works with uniquely named accounts,
//! so tests can run in parallel against one database.

use sqlx::PgPool;
use uuid::Uuid;

use tindahan_core::validation::{Field, FormData};
use tindahan_storefront::config::StorefrontConfig;
use tindahan_storefront::db;

/// Shared state for one integration test.
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the configured database and apply migrations.
    ///
    /// # Panics
    ///
    /// Panics if the database is not configured or unreachable.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let config = StorefrontConfig::from_env().expect("STOREFRONT_DATABASE_URL must be set");
        let pool = db::create_pool(&config)
            .await
            .expect("Failed to connect to test database");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run storefront migrations");
        Self { pool }
    }
}

/// A username no other test run will use.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", suffix.get(..12).unwrap_or(&suffix))
}

/// A complete single-page signup submission for `username`.
#[must_use]
pub fn signup_form(username: &str) -> FormData {
    FormData::new()
        .with(Field::FirstName, "Juan")
        .with(Field::LastName, "Dela Cruz")
        .with(Field::Username, username)
        .with(Field::Email, format!("{username}@example.ph"))
        .with(Field::Password, "Mabuhay1!")
        .with(Field::ConfirmPassword, "Mabuhay1!")
        .with(Field::Mobile, "956 837 0169")
        .with(Field::Region, "R4A")
        .with(Field::Province, "Laguna")
        .with(Field::CityMunicipality, "Calamba")
        .with(Field::Barangay, "Real")
        .with(Field::StreetAddress, "123 Rizal St.")
        .with(Field::PostalCode, "4027")
        .with(Field::PrivacyPolicy, "on")
}

/// A checkout contact submission.
#[must_use]
pub fn checkout_form() -> FormData {
    FormData::new()
        .with(Field::Email, "buyer@example.ph")
        .with(Field::Mobile, "+639568370169")
        .with(Field::Address, "Blk 4 Lot 2, Brgy. Maligaya, Quezon City")
}
