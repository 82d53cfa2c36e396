//! Tindahan Core - value types and form rules for the storefront.
//!
//! This crate is used by:
//! - `storefront` - PostgreSQL repositories and signup/order services
//! - `cli` - Command-line tools for migrations, validator checks and order updates
//!
//! # Architecture
//!
//! The core crate holds types, validation rules and traits only. The two
//! rules that need outside state take it through traits: account lookups
//! through [`validation::UserDirectory`] and the time through
//! [`tracking::Clock`]. Enable the `postgres` feature for `sqlx` encodings.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for IDs, emails, mobile numbers, regions and statuses
//! - [`validation`] - Address, credential and form validation
//! - [`tracking`] - Order status transition stamps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod tracking;
pub mod types;
pub mod validation;

pub use tracking::{Clock, FixedClock, OrderStatusTracker, StatusStamp, StoredStatus, SystemClock};
pub use types::*;
