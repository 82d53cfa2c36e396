//! Validator checks from the command line.
//!
//! Each check returns the normalized value on success or the field errors a
//! form would show. `report` prints either and fails the command on errors.

use clap::Args;
use thiserror::Error;

use tindahan_core::validation::{
    AddressResolver, AddressSelection, Field, FormData, PhilippineRegions, ValidationError,
    ValidationErrors,
};
use tindahan_core::{MobileFormat, MobileNumber, check_strength};

/// Result of one check: the accepted value, or every field error.
pub type Outcome = Result<String, ValidationErrors>;

/// Errors from the `check` command.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The value failed validation.
    #[error("{0} validation error(s)")]
    Rejected(usize),

    /// Errors could not be rendered as JSON.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Address fields, named after the form keys.
#[derive(Debug, Clone, Default, Args)]
pub struct AddressArgs {
    /// Region alias or PSA code (e.g. `NCR`, `R4A`, `040000000`)
    #[arg(long)]
    pub region: Option<String>,

    /// Province (may be omitted for NCR)
    #[arg(long)]
    pub province: Option<String>,

    /// City or municipality
    #[arg(long)]
    pub citymun: Option<String>,

    #[arg(long)]
    pub barangay: Option<String>,

    /// Street address line
    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    /// Also require a mobile number in the strict `956 837 0169` format
    #[arg(long)]
    pub mobile: Option<String>,
}

impl AddressArgs {
    fn to_form_data(&self) -> FormData {
        [
            (Field::Region, &self.region),
            (Field::Province, &self.province),
            (Field::CityMunicipality, &self.citymun),
            (Field::Barangay, &self.barangay),
            (Field::StreetAddress, &self.street),
            (Field::PostalCode, &self.postal_code),
            (Field::Mobile, &self.mobile),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .fold(FormData::new(), |data, (field, value)| data.with(field, value))
    }
}

/// Check a mobile number.
pub fn mobile(value: &str, lenient: bool) -> Outcome {
    let format = if lenient {
        MobileFormat::Lenient
    } else {
        MobileFormat::Strict
    };
    MobileNumber::parse(value.trim(), format)
        .map(MobileNumber::into_inner)
        .map_err(|e| ValidationError::from(e).into())
}

/// Check password strength.
pub fn password(value: &str) -> Outcome {
    check_strength(value)
        .map(|()| "password meets all requirements".to_owned())
        .map_err(|weak| ValidationError::from(weak).into())
}

/// Resolve an address as the signup form would.
pub fn address(args: &AddressArgs) -> Outcome {
    let data = args.to_form_data();
    let resolver = AddressResolver::new(PhilippineRegions);
    let resolver = if args.mobile.is_some() {
        resolver.with_mobile(MobileFormat::Strict)
    } else {
        resolver
    };

    resolver
        .resolve(&data, &FormData::new())
        .into_result()
        .map(|address| describe(&address))
}

fn describe(address: &AddressSelection) -> String {
    let mut line = format!(
        "{}, {}, {}, {}, {} ({}) {}",
        address.street_address,
        address.barangay,
        address.city_municipality,
        address.province,
        address.region.name(),
        address.region.psa_code(),
        address.postal_code,
    );
    if let Some(mobile) = &address.mobile {
        line.push_str(&format!(" / {mobile}"));
    }
    line
}

/// Print the outcome of a check.
///
/// # Errors
///
/// Returns `CheckError::Rejected` when the check produced field errors.
pub fn report(outcome: Outcome, json: bool) -> Result<(), CheckError> {
    match outcome {
        Ok(value) => {
            #[allow(clippy::print_stdout)]
            {
                if json {
                    println!("{}", serde_json::json!({ "valid": true, "value": value }));
                } else {
                    println!("valid: {value}");
                }
            }
            Ok(())
        }
        Err(errors) => {
            #[allow(clippy::print_stdout)]
            {
                if json {
                    println!("{}", serde_json::to_string_pretty(&errors)?);
                } else {
                    for error in &errors {
                        println!("{}: {error}", error.field());
                    }
                }
            }
            Err(CheckError::Rejected(errors.len()))
        }
    }
}
