//! Cascading address resolution.
//!
//! The same resolver backs single-page signup, the shipping step of the
//! multi-step signup, and shipping-address edits. Forms differ only in
//! whether a mobile number is collected and in which format.
//!
//! # Rules
//!
//! - Region is required and must be offered by the [`LocationCatalog`].
//! - City/municipality and barangay are always required.
//! - Province is required unless the selected region is NCR; an NCR address
//!   without a province gets `"NCR"` as its province.
//! - Subordinate values are echoed selections: whatever single value the
//!   browser cascade submitted is accepted once it is non-empty.

use serde::{Deserialize, Serialize};

use super::catalog::LocationCatalog;
use super::error::{ValidationError, ValidationErrors};
use super::form::{Field, FormData, echoed};
use crate::types::{MobileFormat, MobileNumber, Region};

/// Province value stored for NCR addresses.
pub const NCR_PROVINCE: &str = "NCR";

/// Maximum length of province, city/municipality and barangay values.
pub const LOCATION_MAX_LENGTH: usize = 100;

/// Maximum length of the street address line.
pub const STREET_ADDRESS_MAX_LENGTH: usize = 255;

/// Largest postal code the `INTEGER` column holds.
pub const POSTAL_CODE_MAX: u32 = i32::MAX.unsigned_abs();

/// The three tiers below region, in cascade order.
pub const SUBORDINATE_FIELDS: [Field; 3] =
    [Field::Province, Field::CityMunicipality, Field::Barangay];

/// Which subordinate fields must be filled in for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Requiredness {
    pub province: bool,
    pub city_municipality: bool,
    pub barangay: bool,
}

impl Requiredness {
    /// Requiredness for the selected region; `None` means none selected yet.
    #[must_use]
    pub const fn for_region(region: Option<Region>) -> Self {
        let province = match region {
            Some(region) => region.has_provinces(),
            None => true,
        };
        Self {
            province,
            city_municipality: true,
            barangay: true,
        }
    }

    #[must_use]
    pub const fn is_required(&self, field: Field) -> bool {
        match field {
            Field::Province => self.province,
            Field::CityMunicipality => self.city_municipality,
            Field::Barangay => self.barangay,
            _ => false,
        }
    }
}

/// The selectable value of each subordinate field when a form is rendered.
///
/// A select offers at most the one value the user already chose (or was
/// shown); the browser fills in the rest of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressChoices {
    pub province: Option<String>,
    pub city_municipality: Option<String>,
    pub barangay: Option<String>,
}

impl AddressChoices {
    fn echo(submitted: &FormData, prior: &FormData) -> Self {
        let pick = |field| echoed(field, submitted, prior).map(str::to_owned);
        Self {
            province: pick(Field::Province),
            city_municipality: pick(Field::CityMunicipality),
            barangay: pick(Field::Barangay),
        }
    }

    /// Candidate set for `field`: empty or a single value.
    #[must_use]
    pub fn candidates(&self, field: Field) -> &[String] {
        match field {
            Field::Province => self.province.as_slice(),
            Field::CityMunicipality => self.city_municipality.as_slice(),
            Field::Barangay => self.barangay.as_slice(),
            _ => &[],
        }
    }
}

/// A fully validated address, ready to be copied onto a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSelection {
    pub region: Region,
    pub province: String,
    pub city_municipality: String,
    pub barangay: String,
    pub street_address: String,
    pub postal_code: u32,
    pub mobile: Option<MobileNumber>,
}

impl AddressSelection {
    /// Form values for rendering this address as the prior state of an edit.
    #[must_use]
    pub fn to_form_data(&self) -> FormData {
        let data = FormData::new()
            .with(Field::Region, self.region.alias())
            .with(Field::Province, self.province.as_str())
            .with(Field::CityMunicipality, self.city_municipality.as_str())
            .with(Field::Barangay, self.barangay.as_str())
            .with(Field::StreetAddress, self.street_address.as_str())
            .with(Field::PostalCode, self.postal_code.to_string());

        match &self.mobile {
            Some(mobile) => data.with(Field::Mobile, mobile.as_str()),
            None => data,
        }
    }
}

/// Everything a form needs after a submission: what to re-render and
/// either the validated address or the errors to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressResolution {
    /// Region driving requiredness (submission first, then prior render).
    pub region: Option<Region>,
    pub choices: AddressChoices,
    pub requiredness: Requiredness,
    pub outcome: Result<AddressSelection, ValidationErrors>,
}

impl AddressResolution {
    /// Drop the rendering data and keep the outcome.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors when resolution failed.
    pub fn into_result(self) -> Result<AddressSelection, ValidationErrors> {
        self.outcome
    }
}

/// Validates and normalizes submitted addresses.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver<C> {
    catalog: C,
    mobile: Option<MobileFormat>,
}

impl<C: LocationCatalog> AddressResolver<C> {
    /// A resolver for address-only forms (no mobile field).
    #[must_use]
    pub const fn new(catalog: C) -> Self {
        Self {
            catalog,
            mobile: None,
        }
    }

    /// Also require a mobile number in the given format.
    #[must_use]
    pub const fn with_mobile(mut self, format: MobileFormat) -> Self {
        self.mobile = Some(format);
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The region that drives requiredness: submitted, else previously shown.
    #[must_use]
    pub fn selected_region(&self, submitted: &FormData, prior: &FormData) -> Option<Region> {
        echoed(Field::Region, submitted, prior).and_then(|v| self.catalog.lookup_region(v))
    }

    /// Choices and requiredness for rendering, without validating anything.
    #[must_use]
    pub fn render_state(
        &self,
        submitted: &FormData,
        prior: &FormData,
    ) -> (AddressChoices, Requiredness) {
        let region = self.selected_region(submitted, prior);
        (
            AddressChoices::echo(submitted, prior),
            Requiredness::for_region(region),
        )
    }

    /// Validate a submission against the prior render.
    ///
    /// All field errors are collected; the outcome is either a complete
    /// [`AddressSelection`] or the full error list, never a partial address.
    #[must_use]
    pub fn resolve(&self, submitted: &FormData, prior: &FormData) -> AddressResolution {
        let region = self.selected_region(submitted, prior);
        let requiredness = Requiredness::for_region(region);
        let choices = AddressChoices::echo(submitted, prior);
        let outcome = self.validate(submitted, requiredness);

        AddressResolution {
            region,
            choices,
            requiredness,
            outcome,
        }
    }

    /// Validate an edit of a stored address.
    ///
    /// The stored address is the prior render. Address-only edits do not
    /// collect a mobile number, so the stored one is carried over.
    #[must_use]
    pub fn resolve_edit(
        &self,
        submitted: &FormData,
        stored: Option<&AddressSelection>,
    ) -> AddressResolution {
        let prior = stored.map(AddressSelection::to_form_data).unwrap_or_default();
        let mut resolution = self.resolve(submitted, &prior);
        if let (Ok(address), Some(stored)) = (&mut resolution.outcome, stored)
            && address.mobile.is_none()
        {
            address.mobile.clone_from(&stored.mobile);
        }
        resolution
    }

    fn validate(
        &self,
        submitted: &FormData,
        requiredness: Requiredness,
    ) -> Result<AddressSelection, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let region = match submitted.value(Field::Region) {
            None => {
                errors.push(ValidationError::MissingRequiredField(Field::Region));
                None
            }
            Some(value) => {
                let region = self.catalog.lookup_region(value);
                if region.is_none() {
                    errors.push(ValidationError::InvalidChoice(Field::Region));
                }
                region
            }
        };

        let mut province = bounded(submitted, Field::Province, LOCATION_MAX_LENGTH, &mut errors);
        let city_municipality = bounded(
            submitted,
            Field::CityMunicipality,
            LOCATION_MAX_LENGTH,
            &mut errors,
        );
        let barangay = bounded(submitted, Field::Barangay, LOCATION_MAX_LENGTH, &mut errors);

        if region == Some(Region::Ncr) && province.is_none() {
            province = Some(NCR_PROVINCE.to_owned());
        }

        for (field, value) in [
            (Field::Province, &province),
            (Field::CityMunicipality, &city_municipality),
            (Field::Barangay, &barangay),
        ] {
            if value.is_none() && requiredness.is_required(field) && !errors.has_field(field) {
                errors.push(ValidationError::MissingRequiredField(field));
            }
        }

        let street_address = bounded(
            submitted,
            Field::StreetAddress,
            STREET_ADDRESS_MAX_LENGTH,
            &mut errors,
        );
        if street_address.is_none() && !errors.has_field(Field::StreetAddress) {
            errors.push(ValidationError::MissingRequiredField(Field::StreetAddress));
        }

        let postal_code = match submitted.value(Field::PostalCode) {
            None => {
                errors.push(ValidationError::MissingRequiredField(Field::PostalCode));
                None
            }
            Some(value) => {
                let parsed = value
                    .parse::<u32>()
                    .ok()
                    .filter(|code| *code <= POSTAL_CODE_MAX);
                if parsed.is_none() {
                    errors.push(ValidationError::InvalidPostalCode);
                }
                parsed
            }
        };

        let mobile = match self.mobile {
            None => None,
            Some(format) => match submitted.value(Field::Mobile) {
                None => {
                    errors.push(ValidationError::MissingRequiredField(Field::Mobile));
                    None
                }
                Some(value) => match MobileNumber::parse(value, format) {
                    Ok(mobile) => Some(mobile),
                    Err(err) => {
                        errors.push(err);
                        None
                    }
                },
            },
        };

        match (
            region,
            province,
            city_municipality,
            barangay,
            street_address,
            postal_code,
        ) {
            (
                Some(region),
                Some(province),
                Some(city_municipality),
                Some(barangay),
                Some(street_address),
                Some(postal_code),
            ) if errors.is_empty() => Ok(AddressSelection {
                region,
                province,
                city_municipality,
                barangay,
                street_address,
                postal_code,
                mobile,
            }),
            _ => Err(errors),
        }
    }
}

/// Trimmed value of `field`, recording an error if it exceeds `max` chars.
fn bounded(
    data: &FormData,
    field: Field,
    max: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = data.value(field)?;
    if value.chars().count() > max {
        errors.push(ValidationError::FieldTooLong { field, max });
        return None;
    }
    Some(value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::catalog::PhilippineRegions;

    fn laguna() -> FormData {
        FormData::new()
            .with(Field::Region, "R4A")
            .with(Field::Province, "Laguna")
            .with(Field::CityMunicipality, "Calamba")
            .with(Field::Barangay, "Real")
            .with(Field::StreetAddress, "123 Rizal St.")
            .with(Field::PostalCode, "4027")
    }

    fn resolver() -> AddressResolver<PhilippineRegions> {
        AddressResolver::new(PhilippineRegions)
    }

    #[test]
    fn test_complete_address_resolves() {
        let address = resolver()
            .resolve(&laguna(), &FormData::new())
            .into_result()
            .unwrap();
        assert_eq!(address.region, Region::Calabarzon);
        assert_eq!(address.province, "Laguna");
        assert_eq!(address.city_municipality, "Calamba");
        assert_eq!(address.postal_code, 4027);
        assert_eq!(address.mobile, None);
    }

    #[test]
    fn test_province_required_outside_ncr() {
        for region in Region::ALL.into_iter().filter(|r| r.has_provinces()) {
            let data = laguna()
                .with(Field::Region, region.alias())
                .with(Field::Province, "");
            let errors = resolver()
                .resolve(&data, &FormData::new())
                .into_result()
                .unwrap_err();
            assert_eq!(
                errors.into_vec(),
                vec![ValidationError::MissingRequiredField(Field::Province)],
                "region {region}"
            );
        }
    }

    #[test]
    fn test_ncr_defaults_province() {
        let data = laguna()
            .with(Field::Region, "NCR")
            .with(Field::Province, "")
            .with(Field::CityMunicipality, "Quezon City")
            .with(Field::Barangay, "Bagumbayan");
        let resolution = resolver().resolve(&data, &FormData::new());
        assert!(!resolution.requiredness.province);

        let address = resolution.into_result().unwrap();
        assert_eq!(address.region, Region::Ncr);
        assert_eq!(address.province, NCR_PROVINCE);
    }

    #[test]
    fn test_ncr_keeps_submitted_province() {
        let data = laguna()
            .with(Field::Region, "130000000")
            .with(Field::Province, "Metro Manila");
        let address = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap();
        assert_eq!(address.province, "Metro Manila");
    }

    #[test]
    fn test_city_and_barangay_always_required() {
        let data = laguna()
            .with(Field::Region, "NCR")
            .with(Field::CityMunicipality, "")
            .with(Field::Barangay, " ");
        let errors = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap_err();
        assert!(errors.contains(&ValidationError::MissingRequiredField(
            Field::CityMunicipality
        )));
        assert!(errors.contains(&ValidationError::MissingRequiredField(Field::Barangay)));
        assert!(!errors.has_field(Field::Province));
    }

    #[test]
    fn test_missing_region() {
        let data = laguna().with(Field::Region, "");
        let resolution = resolver().resolve(&data, &FormData::new());
        assert_eq!(resolution.region, None);
        assert!(resolution.requiredness.province);

        let errors = resolution.into_result().unwrap_err();
        assert_eq!(
            errors.into_vec(),
            vec![ValidationError::MissingRequiredField(Field::Region)]
        );
    }

    #[test]
    fn test_unknown_region() {
        let data = laguna().with(Field::Region, "R14");
        let errors = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidChoice(Field::Region)));
    }

    #[test]
    fn test_choices_echo_submission_then_prior() {
        let submitted = FormData::new()
            .with(Field::Region, "R4A")
            .with(Field::Province, "Batangas");
        let prior = FormData::new()
            .with(Field::Province, "Laguna")
            .with(Field::CityMunicipality, "Calamba");

        let (choices, _) = resolver().render_state(&submitted, &prior);
        assert_eq!(choices.candidates(Field::Province), ["Batangas".to_owned()]);
        assert_eq!(
            choices.candidates(Field::CityMunicipality),
            ["Calamba".to_owned()]
        );
        assert!(choices.candidates(Field::Barangay).is_empty());
    }

    #[test]
    fn test_requiredness_follows_prior_region_on_initial_render() {
        let prior = FormData::new().with(Field::Region, "NCR");
        let (_, requiredness) = resolver().render_state(&FormData::new(), &prior);
        assert!(!requiredness.province);
        assert!(requiredness.city_municipality);
        assert!(requiredness.barangay);
    }

    #[test]
    fn test_requiredness_map() {
        assert!(!Requiredness::for_region(Some(Region::Ncr)).province);
        assert!(Requiredness::for_region(Some(Region::Car)).province);
        assert!(Requiredness::for_region(None).province);
        assert!(!Requiredness::for_region(None).is_required(Field::StreetAddress));
    }

    #[test]
    fn test_invalid_postal_code() {
        let data = laguna().with(Field::PostalCode, "40A7");
        let errors = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.into_vec(), vec![ValidationError::InvalidPostalCode]);
    }

    #[test]
    fn test_postal_code_out_of_column_range() {
        let data = laguna().with(Field::PostalCode, "3000000000");
        let errors = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.into_vec(), vec![ValidationError::InvalidPostalCode]);

        let data = laguna().with(Field::PostalCode, POSTAL_CODE_MAX.to_string());
        let address = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap();
        assert!(i32::try_from(address.postal_code).is_ok());
    }

    #[test]
    fn test_location_too_long() {
        let data = laguna().with(Field::Barangay, "x".repeat(101));
        let errors = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap_err();
        assert_eq!(
            errors.into_vec(),
            vec![ValidationError::FieldTooLong {
                field: Field::Barangay,
                max: LOCATION_MAX_LENGTH
            }]
        );
    }

    #[test]
    fn test_strict_mobile_when_requested() {
        let signup = resolver().with_mobile(MobileFormat::Strict);

        let ok = signup
            .resolve(&laguna().with(Field::Mobile, "956 837 0169"), &FormData::new())
            .into_result()
            .unwrap();
        assert_eq!(ok.mobile.unwrap().as_str(), "956 837 0169");

        let errors = signup
            .resolve(&laguna().with(Field::Mobile, "09568370169"), &FormData::new())
            .into_result()
            .unwrap_err();
        assert_eq!(
            errors.into_vec(),
            vec![ValidationError::InvalidMobileFormat(MobileFormat::Strict)]
        );

        let errors = signup
            .resolve(&laguna(), &FormData::new())
            .into_result()
            .unwrap_err();
        assert!(errors.contains(&ValidationError::MissingRequiredField(Field::Mobile)));
    }

    #[test]
    fn test_edit_round_trips_stored_address() {
        let stored = resolver()
            .resolve(&laguna(), &FormData::new())
            .into_result()
            .unwrap();
        let prior = stored.to_form_data();

        let resubmitted = prior.clone().with(Field::StreetAddress, "45 Mabini St.");
        let updated = resolver()
            .resolve(&resubmitted, &prior)
            .into_result()
            .unwrap();
        assert_eq!(updated.street_address, "45 Mabini St.");
        assert_eq!(updated.barangay, stored.barangay);
    }

    #[test]
    fn test_resolve_edit_keeps_stored_mobile() {
        let stored = resolver()
            .with_mobile(MobileFormat::Strict)
            .resolve(&laguna().with(Field::Mobile, "956 837 0169"), &FormData::new())
            .into_result()
            .unwrap();

        let submitted = laguna().with(Field::Barangay, "Parian");
        let resolution = resolver().resolve_edit(&submitted, Some(&stored));
        assert_eq!(resolution.choices.candidates(Field::Barangay), ["Parian".to_owned()]);

        let updated = resolution.into_result().unwrap();
        assert_eq!(updated.barangay, "Parian");
        assert_eq!(updated.mobile, stored.mobile);
    }

    #[test]
    fn test_resolve_edit_without_stored_address() {
        let resolution = resolver().resolve_edit(&FormData::new(), None);
        assert!(resolution.choices.candidates(Field::Province).is_empty());
        assert!(resolution.into_result().is_err());
    }

    #[test]
    fn test_errors_are_collected_together() {
        let data = FormData::new().with(Field::Region, "R1");
        let errors = resolver()
            .resolve(&data, &FormData::new())
            .into_result()
            .unwrap_err();
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(
            fields,
            vec![
                Field::Province,
                Field::CityMunicipality,
                Field::Barangay,
                Field::StreetAddress,
                Field::PostalCode,
            ]
        );
    }
}
