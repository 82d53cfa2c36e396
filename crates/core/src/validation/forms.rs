//! Storefront forms built from the address, credential and mobile rules.
//!
//! | Form | Address | Mobile | Credentials |
//! |------|---------|--------|-------------|
//! | Single-page signup | yes | strict | username, email, password |
//! | Signup step 1, personal information | no | strict | none |
//! | Signup step 2, account security | no | no | username, password |
//! | Signup step 3, shipping address | yes | no | none |
//! | Shipping address edit | yes | no | none |
//! | Checkout contact | free text | lenient | email syntax only |
//! | Order update (staff) | no | no | none |

use chrono::NaiveDate;

use super::address::{AddressResolver, AddressSelection};
use super::catalog::LocationCatalog;
use super::credentials::{CredentialInput, CredentialValidator, UserDirectory};
use super::error::{ValidationError, ValidationErrors};
use super::form::{Field, FormData};
use crate::types::{Email, MobileFormat, MobileNumber, OrderStatus};

/// Maximum length of first and last names.
pub const NAME_MAX_LENGTH: usize = 30;

/// Maximum length of the raw mobile input on the checkout form.
pub const CHECKOUT_MOBILE_MAX_LENGTH: usize = 15;

/// Maximum length of the free-text checkout address.
pub const CHECKOUT_ADDRESS_MAX_LENGTH: usize = 500;

/// Why a form that consults the user directory could not be accepted.
#[derive(Debug, thiserror::Error)]
pub enum FormError<E> {
    /// The submission has field errors to show the user.
    #[error(transparent)]
    Invalid(ValidationErrors),
    /// The directory could not be queried; nothing is known about validity.
    #[error("user directory lookup failed: {0}")]
    Lookup(#[source] E),
}

impl<E> From<ValidationErrors> for FormError<E> {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

// =============================================================================
// Shared field rules
// =============================================================================

fn required_text(
    data: &FormData,
    field: Field,
    max: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(value) = data.value(field) else {
        errors.push(ValidationError::MissingRequiredField(field));
        return None;
    };
    if value.chars().count() > max {
        errors.push(ValidationError::FieldTooLong { field, max });
        return None;
    }
    Some(value.to_owned())
}

fn required_mobile(
    data: &FormData,
    format: MobileFormat,
    errors: &mut ValidationErrors,
) -> Option<MobileNumber> {
    let Some(value) = data.value(Field::Mobile) else {
        errors.push(ValidationError::MissingRequiredField(Field::Mobile));
        return None;
    };
    match MobileNumber::parse(value, format) {
        Ok(mobile) => Some(mobile),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn privacy_policy(data: &FormData, errors: &mut ValidationErrors) {
    if !data.is_checked(Field::PrivacyPolicy) {
        errors.push(ValidationError::PrivacyPolicyNotAccepted);
    }
}

fn credential_input(data: &FormData, with_email: bool) -> CredentialInput<'_> {
    CredentialInput {
        username: data.value(Field::Username).unwrap_or_default(),
        email: with_email.then(|| data.value(Field::Email).unwrap_or_default()),
        // Passwords are taken verbatim; surrounding whitespace is significant.
        password: data.raw(Field::Password).unwrap_or_default(),
        confirm_password: data.raw(Field::ConfirmPassword).unwrap_or_default(),
    }
}

// =============================================================================
// Signup
// =============================================================================

/// A validated new customer account, from either signup flow.
#[derive(Clone)]
pub struct CustomerSignup {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// Absent when the account came through the step-based flow.
    pub email: Option<Email>,
    password: String,
    pub address: AddressSelection,
}

impl CustomerSignup {
    /// The accepted plaintext password, for handing to the password hasher.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Assemble an account from the three signup steps.
    ///
    /// The mobile number collected in step 1 becomes the address mobile.
    #[must_use]
    pub fn from_steps(
        personal: PersonalInformation,
        security: AccountSecurity,
        mut address: AddressSelection,
    ) -> Self {
        address.mobile = Some(personal.mobile);
        Self {
            first_name: personal.first_name,
            last_name: personal.last_name,
            username: security.username,
            email: None,
            password: security.password,
            address,
        }
    }
}

impl std::fmt::Debug for CustomerSignup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerSignup")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("address", &self.address)
            .finish()
    }
}

/// Single-page signup: names, credentials, full address with a strict
/// mobile number, and privacy-policy acceptance.
#[derive(Debug, Clone)]
pub struct CustomerSignupForm<D, C> {
    credentials: CredentialValidator<D>,
    address: AddressResolver<C>,
}

impl<D: UserDirectory, C: LocationCatalog> CustomerSignupForm<D, C> {
    #[must_use]
    pub const fn new(directory: D, catalog: C) -> Self {
        Self {
            credentials: CredentialValidator::new(directory),
            address: AddressResolver::new(catalog).with_mobile(MobileFormat::Strict),
        }
    }

    /// The resolver, for rendering address choices.
    #[must_use]
    pub const fn address(&self) -> &AddressResolver<C> {
        &self.address
    }

    /// Validate a submission, reporting every field error at once.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`] with all field errors, or
    /// [`FormError::Lookup`] if the user directory could not be queried.
    pub async fn validate(
        &self,
        submitted: &FormData,
        prior: &FormData,
    ) -> Result<CustomerSignup, FormError<D::Error>> {
        let mut errors = ValidationErrors::new();

        let first_name = required_text(submitted, Field::FirstName, NAME_MAX_LENGTH, &mut errors);
        let last_name = required_text(submitted, Field::LastName, NAME_MAX_LENGTH, &mut errors);

        let input = credential_input(submitted, true);
        errors.extend(
            self.credentials
                .validate(&input)
                .await
                .map_err(FormError::Lookup)?,
        );

        let address = match self.address.resolve(submitted, prior).into_result() {
            Ok(address) => Some(address),
            Err(address_errors) => {
                errors.extend(address_errors);
                None
            }
        };

        privacy_policy(submitted, &mut errors);

        let email = input.email.and_then(|v| Email::parse(v).ok());
        match (first_name, last_name, email, address) {
            (Some(first_name), Some(last_name), Some(email), Some(address)) if errors.is_empty() => {
                Ok(CustomerSignup {
                    first_name,
                    last_name,
                    username: input.username.to_owned(),
                    email: Some(email),
                    password: input.password.to_owned(),
                    address,
                })
            }
            _ => Err(FormError::Invalid(errors)),
        }
    }
}

/// Signup step 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalInformation {
    pub first_name: String,
    pub last_name: String,
    pub mobile: MobileNumber,
}

impl PersonalInformation {
    /// # Errors
    ///
    /// Returns every field error in the submission.
    pub fn from_form(data: &FormData) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first_name = required_text(data, Field::FirstName, NAME_MAX_LENGTH, &mut errors);
        let last_name = required_text(data, Field::LastName, NAME_MAX_LENGTH, &mut errors);
        let mobile = required_mobile(data, MobileFormat::Strict, &mut errors);

        match (first_name, last_name, mobile) {
            (Some(first_name), Some(last_name), Some(mobile)) => Ok(Self {
                first_name,
                last_name,
                mobile,
            }),
            _ => Err(errors),
        }
    }
}

/// Signup step 2.
#[derive(Clone)]
pub struct AccountSecurity {
    pub username: String,
    password: String,
}

impl AccountSecurity {
    /// Validate username, password, confirmation and privacy acceptance.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`] with every field error, or
    /// [`FormError::Lookup`] if the directory could not be queried.
    pub async fn from_form<D: UserDirectory>(
        data: &FormData,
        credentials: &CredentialValidator<D>,
    ) -> Result<Self, FormError<D::Error>> {
        let input = credential_input(data, false);
        let mut errors = credentials
            .validate(&input)
            .await
            .map_err(FormError::Lookup)?;
        privacy_policy(data, &mut errors);

        errors
            .into_result(Self {
                username: input.username.to_owned(),
                password: input.password.to_owned(),
            })
            .map_err(FormError::Invalid)
    }
}

impl std::fmt::Debug for AccountSecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSecurity")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Contact details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutContact {
    pub email: Email,
    /// Normalized `09…` digits.
    pub mobile: MobileNumber,
    pub address: String,
}

impl CheckoutContact {
    /// # Errors
    ///
    /// Returns every field error in the submission.
    pub fn from_form(data: &FormData) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = match data.value(Field::Email) {
            None => {
                errors.push(ValidationError::MissingRequiredField(Field::Email));
                None
            }
            Some(value) => Email::parse(value)
                .map_err(|err| errors.push(ValidationError::InvalidEmail(err)))
                .ok(),
        };

        let mobile = match data.value(Field::Mobile) {
            Some(value) if value.chars().count() > CHECKOUT_MOBILE_MAX_LENGTH => {
                errors.push(ValidationError::FieldTooLong {
                    field: Field::Mobile,
                    max: CHECKOUT_MOBILE_MAX_LENGTH,
                });
                None
            }
            _ => required_mobile(data, MobileFormat::Lenient, &mut errors),
        };

        let address = required_text(
            data,
            Field::Address,
            CHECKOUT_ADDRESS_MAX_LENGTH,
            &mut errors,
        );

        match (email, mobile, address) {
            (Some(email), Some(mobile), Some(address)) => Ok(Self {
                email,
                mobile,
                address,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Order update
// =============================================================================

/// A staff edit to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub estimated_delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl OrderUpdate {
    /// Parse the order edit form. Dates use `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns every field error in the submission.
    pub fn from_form(data: &FormData) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let status = match data.value(Field::Status) {
            None => {
                errors.push(ValidationError::MissingRequiredField(Field::Status));
                None
            }
            Some(value) => value
                .parse::<OrderStatus>()
                .map_err(|_| errors.push(ValidationError::InvalidChoice(Field::Status)))
                .ok(),
        };

        let estimated_delivery_date = data.value(Field::EstimatedDeliveryDate).and_then(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| {
                    errors.push(ValidationError::InvalidDate(Field::EstimatedDeliveryDate));
                })
                .ok()
        });

        let notes = data.value(Field::Notes).map(str::to_owned);

        match status {
            Some(status) if errors.is_empty() => Ok(Self {
                status,
                estimated_delivery_date,
                notes,
            }),
            _ => Err(errors),
        }
    }
}
