//! Philippine mobile numbers.
//!
//! Two input formats are accepted at different call sites and are kept
//! separate on purpose:
//!
//! - [`MobileFormat::Strict`] (account forms): exactly `DDD DDD DDDD`, the
//!   subscriber number without the leading zero, grouped by single spaces.
//!   The input is kept verbatim.
//! - [`MobileFormat::Lenient`] (checkout contact): any punctuation is
//!   dropped, a `63` country prefix becomes `0`, and the result must be an
//!   11-digit `09…` number. The cleaned digits are kept.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which normalization rule a form applies to its mobile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileFormat {
    Strict,
    Lenient,
}

impl MobileFormat {
    /// User-facing hint shown when input does not match.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Strict => "Enter number as '956 837 0169' (10 digits, spaces required).",
            Self::Lenient => "Enter a valid Philippine mobile number (e.g., 09568370169).",
        }
    }
}

/// Input did not match the expected [`MobileFormat`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}", .format.hint())]
pub struct MobileError {
    pub format: MobileFormat,
}

/// A mobile number that passed one of the two format rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Parse using the given format.
    ///
    /// # Errors
    ///
    /// Returns [`MobileError`] carrying `format` when the input is rejected.
    pub fn parse(s: &str, format: MobileFormat) -> Result<Self, MobileError> {
        match format {
            MobileFormat::Strict => Self::parse_strict(s),
            MobileFormat::Lenient => Self::parse_lenient(s),
        }
    }

    /// Accept exactly `DDD DDD DDDD`.
    ///
    /// # Errors
    ///
    /// Returns [`MobileError`] for anything else, including ungrouped digits.
    pub fn parse_strict(s: &str) -> Result<Self, MobileError> {
        let grouped = s.len() == 12
            && s.bytes().enumerate().all(|(i, b)| match i {
                3 | 7 => b == b' ',
                _ => b.is_ascii_digit(),
            });

        if grouped {
            Ok(Self(s.to_owned()))
        } else {
            Err(MobileError {
                format: MobileFormat::Strict,
            })
        }
    }

    /// Strip punctuation, rewrite `63…` to `0…`, require `09` + 9 digits.
    ///
    /// # Errors
    ///
    /// Returns [`MobileError`] when the cleaned digits are not an 11-digit
    /// `09…` number.
    pub fn parse_lenient(s: &str) -> Result<Self, MobileError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        let digits = match digits.strip_prefix("63") {
            Some(rest) => format!("0{rest}"),
            None => digits,
        };

        if digits.len() == 11 && digits.starts_with("09") {
            Ok(Self(digits))
        } else {
            Err(MobileError {
                format: MobileFormat::Lenient,
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MobileNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for MobileNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MobileNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Stored numbers were normalized on the way in, in either format
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for MobileNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
