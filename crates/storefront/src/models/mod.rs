//! Domain models for the storefront.
//!
//! These are the records the repositories return. Validated input types
//! (`CustomerSignup`, `AddressSelection`, `OrderUpdate`) live in
//! `tindahan_core::validation`.

pub mod customer;
pub mod order;
pub mod user;

pub use customer::Customer;
pub use order::Order;
pub use user::User;
