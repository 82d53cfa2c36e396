//! Form validation for customer signup, address editing, checkout and
//! order updates.
//!
//! Validators never stop at the first problem. Each one returns every
//! field error it finds so a form can be re-rendered with all of them.
//! Checks that need the account store go through [`UserDirectory`]; region
//! data comes from a [`LocationCatalog`].

pub mod address;
pub mod catalog;
pub mod credentials;
pub mod error;
pub mod form;
pub mod forms;

pub use address::{
    AddressChoices, AddressResolution, AddressResolver, AddressSelection, NCR_PROVINCE,
    POSTAL_CODE_MAX, Requiredness,
};
pub use catalog::{LocationCatalog, PhilippineRegions};
pub use credentials::{CredentialInput, CredentialValidator, USERNAME_MAX_LENGTH, UserDirectory};
pub use error::{ValidationError, ValidationErrors};
pub use form::{Field, FormData};
pub use forms::{
    AccountSecurity, CheckoutContact, CustomerSignup, CustomerSignupForm, FormError, OrderUpdate,
    PersonalInformation,
};
