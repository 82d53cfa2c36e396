//! Form field names and submitted key/value data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named input on one of the storefront forms.
///
/// [`Field::key`] is the name used in submitted form data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Region,
    Province,
    CityMunicipality,
    Barangay,
    StreetAddress,
    PostalCode,
    Mobile,
    FirstName,
    LastName,
    Username,
    Email,
    Password,
    ConfirmPassword,
    PrivacyPolicy,
    /// Free-text delivery address on the checkout form.
    Address,
    Status,
    EstimatedDeliveryDate,
    Notes,
}

impl Field {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Province => "province",
            Self::CityMunicipality => "citymun",
            Self::Barangay => "barangay",
            Self::StreetAddress => "street_address",
            Self::PostalCode => "postal_code",
            Self::Mobile => "mobile",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::PrivacyPolicy => "privacy_policy",
            Self::Address => "address",
            Self::Status => "status",
            Self::EstimatedDeliveryDate => "estimated_delivery_date",
            Self::Notes => "notes",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Province => "Province",
            Self::CityMunicipality => "City/Municipality",
            Self::Barangay => "Barangay",
            Self::StreetAddress => "Street address",
            Self::PostalCode => "Postal code",
            Self::Mobile => "Mobile",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm Password",
            Self::PrivacyPolicy => "I agree to the Privacy Policy",
            Self::Address => "Address",
            Self::Status => "Status",
            Self::EstimatedDeliveryDate => "Estimated delivery date",
            Self::Notes => "Notes",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Submitted (or previously rendered) form values, keyed by field name.
///
/// Keys absent from the map and values that are blank after trimming are
/// treated the same way: the field was not filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field.key().to_owned(), value.into());
    }

    /// The trimmed value, or `None` when missing or blank.
    #[must_use]
    pub fn value(&self, field: Field) -> Option<&str> {
        self.0
            .get(field.key())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The value exactly as submitted, or `None` when missing or empty.
    ///
    /// Used for passwords, where surrounding whitespace is significant.
    #[must_use]
    pub fn raw(&self, field: Field) -> Option<&str> {
        self.0
            .get(field.key())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Checkbox semantics: present and not one of `false`, `0`, `off`.
    #[must_use]
    pub fn is_checked(&self, field: Field) -> bool {
        self.value(field).is_some_and(|v| {
            !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "off")
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The echoed value for `field`: the submission's, else the prior render's.
#[must_use]
pub fn echoed<'a>(field: Field, submitted: &'a FormData, prior: &'a FormData) -> Option<&'a str> {
    submitted.value(field).or_else(|| prior.value(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_trims_and_drops_blank() {
        let data: FormData = [("province", "  Laguna "), ("citymun", "   ")]
            .into_iter()
            .collect();
        assert_eq!(data.value(Field::Province), Some("Laguna"));
        assert_eq!(data.value(Field::CityMunicipality), None);
        assert_eq!(data.value(Field::Barangay), None);
    }

    #[test]
    fn test_raw_keeps_whitespace() {
        let data = FormData::new().with(Field::Password, " Secret1! ");
        assert_eq!(data.raw(Field::Password), Some(" Secret1! "));
        assert_eq!(data.value(Field::Password), Some("Secret1!"));
    }

    #[test]
    fn test_checkbox_values() {
        let checked = FormData::new().with(Field::PrivacyPolicy, "on");
        let unchecked = FormData::new().with(Field::PrivacyPolicy, "false");
        assert!(checked.is_checked(Field::PrivacyPolicy));
        assert!(!unchecked.is_checked(Field::PrivacyPolicy));
        assert!(!FormData::new().is_checked(Field::PrivacyPolicy));
    }

    #[test]
    fn test_echoed_prefers_submission() {
        let submitted = FormData::new().with(Field::Barangay, "San Antonio");
        let prior = FormData::new()
            .with(Field::Barangay, "Poblacion")
            .with(Field::CityMunicipality, "Calamba");
        assert_eq!(echoed(Field::Barangay, &submitted, &prior), Some("San Antonio"));
        assert_eq!(echoed(Field::CityMunicipality, &submitted, &prior), Some("Calamba"));
        assert_eq!(echoed(Field::Province, &submitted, &prior), None);
    }

    #[test]
    fn test_deserializes_from_flat_map() {
        let data: FormData = serde_json::from_str(r#"{"region":"NCR"}"#).unwrap_or_default();
        assert_eq!(data.value(Field::Region), Some("NCR"));
    }
}
