//! Value types shared by the storefront.
//!
//! Each type validates on construction, so holding one means the value
//! already passed its format rules.

pub mod email;
pub mod id;
pub mod mobile;
pub mod password;
pub mod region;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use mobile::{MobileError, MobileFormat, MobileNumber};
pub use password::{
    MIN_PASSWORD_LENGTH, PASSWORD_SYMBOLS, PasswordRequirement, WeakPassword, check_strength,
};
pub use region::{Region, RegionError};
pub use status::OrderStatus;
