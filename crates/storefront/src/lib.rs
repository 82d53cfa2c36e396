//! Tindahan Storefront library.
//!
//! `PostgreSQL` persistence and the services that connect the form rules in
//! `tindahan-core` to it: customer signup, shipping-address edits, checkout
//! and staff order updates.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use config::{ConfigError, StorefrontConfig};
pub use db::RepositoryError;
pub use services::ServiceError;
