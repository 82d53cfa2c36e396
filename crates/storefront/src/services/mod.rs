//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `signup` - Customer registration (single-page and step-based)
//! - `customers` - Shipping address edits
//! - `orders` - Checkout and staff order updates

pub mod customers;
mod error;
pub mod orders;
pub mod signup;

pub use customers::CustomerService;
pub use error::ServiceError;
pub use orders::OrderService;
pub use signup::{RegisteredCustomer, SignupService, SignupSteps};
