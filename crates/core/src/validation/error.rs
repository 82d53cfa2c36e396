//! Field-scoped validation errors.
//!
//! Every error here is recoverable: it is shown next to the offending field
//! and the user resubmits.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};

use super::form::Field;
use crate::types::{EmailError, MobileFormat, WeakPassword};

/// One problem with one field of a submitted form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unable to use this username. Please choose another.")]
    DuplicateUsername,
    #[error("An account with this email already exists.")]
    DuplicateEmail,
    #[error("{0}")]
    WeakPassword(WeakPassword),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("{}", missing_message(.0))]
    MissingRequiredField(Field),
    #[error("{}", .0.hint())]
    InvalidMobileFormat(MobileFormat),
    #[error("You must accept the privacy policy to create an account")]
    PrivacyPolicyNotAccepted,
    #[error("Ensure this value has at most {max} characters.")]
    FieldTooLong { field: Field, max: usize },
    #[error("Select a valid choice.")]
    InvalidChoice(Field),
    #[error("Enter a valid postal code.")]
    InvalidPostalCode,
    #[error("Enter a valid email address.")]
    InvalidEmail(#[source] EmailError),
    #[error("Enter a valid date.")]
    InvalidDate(Field),
}

const fn missing_message(field: &Field) -> &'static str {
    match field {
        Field::Province => "Province is required for this region.",
        _ => "This field is required.",
    }
}

impl ValidationError {
    /// The field this error is reported against.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::DuplicateUsername => Field::Username,
            Self::DuplicateEmail | Self::InvalidEmail(_) => Field::Email,
            Self::WeakPassword(_) => Field::Password,
            Self::PasswordMismatch => Field::ConfirmPassword,
            Self::MissingRequiredField(field)
            | Self::FieldTooLong { field, .. }
            | Self::InvalidChoice(field)
            | Self::InvalidDate(field) => *field,
            Self::InvalidMobileFormat(_) => Field::Mobile,
            Self::PrivacyPolicyNotAccepted => Field::PrivacyPolicy,
            Self::InvalidPostalCode => Field::PostalCode,
        }
    }
}

impl From<WeakPassword> for ValidationError {
    fn from(weak: WeakPassword) -> Self {
        Self::WeakPassword(weak)
    }
}

impl From<crate::types::MobileError> for ValidationError {
    fn from(err: crate::types::MobileError) -> Self {
        Self::InvalidMobileFormat(err.format)
    }
}

/// All errors collected from one submission, in discovery order.
#[derive(thiserror::Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {e}", e.field()))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: impl Into<ValidationError>) {
        self.0.push(error.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    /// Errors reported against `field`.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |e| e.field() == field)
    }

    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.for_field(field).next().is_some()
    }

    /// `Ok(value)` when nothing was collected, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// Messages grouped by form key, for re-rendering a form.
    #[must_use]
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            map.entry(error.field().key())
                .or_default()
                .push(error.to_string());
        }
        map
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.by_field().serialize(serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::check_strength;

    #[test]
    fn test_field_mapping() {
        assert_eq!(ValidationError::DuplicateUsername.field(), Field::Username);
        assert_eq!(ValidationError::PasswordMismatch.field(), Field::ConfirmPassword);
        assert_eq!(
            ValidationError::InvalidMobileFormat(MobileFormat::Strict).field(),
            Field::Mobile
        );
        assert_eq!(
            ValidationError::FieldTooLong {
                field: Field::FirstName,
                max: 30
            }
            .field(),
            Field::FirstName
        );
    }

    #[test]
    fn test_province_has_its_own_message() {
        assert_eq!(
            ValidationError::MissingRequiredField(Field::Province).to_string(),
            "Province is required for this region."
        );
        assert_eq!(
            ValidationError::MissingRequiredField(Field::Barangay).to_string(),
            "This field is required."
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(5), Ok(5));

        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::PasswordMismatch);
        assert!(errors.into_result(5).is_err());
    }

    #[test]
    fn test_serializes_grouped_by_key() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::DuplicateUsername);
        errors.push(check_strength("abc").unwrap_err());
        errors.push(ValidationError::MissingRequiredField(Field::CityMunicipality));

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json["username"][0],
            "Unable to use this username. Please choose another."
        );
        assert_eq!(json["citymun"][0], "This field is required.");
        assert!(json["password"][0].as_str().unwrap().contains("8 characters"));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::PasswordMismatch);
        errors.push(ValidationError::InvalidPostalCode);
        assert_eq!(
            errors.to_string(),
            "confirm_password: Passwords do not match; postal_code: Enter a valid postal code."
        );
    }
}
