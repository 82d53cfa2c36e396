//! Philippine administrative regions.
//!
//! Regions are stored by their short alias (`NCR`, `R4A`, ...). The client-side
//! address cascade submits 9-digit PSA codes instead, so parsing accepts both.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A string that names no known region.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown region: {0}")]
pub struct RegionError(pub String);

/// Top tier of the Philippine address hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "NCR")]
    Ncr,
    #[serde(rename = "CAR")]
    Car,
    #[serde(rename = "R1")]
    IlocosRegion,
    #[serde(rename = "R2")]
    CagayanValley,
    #[serde(rename = "R3")]
    CentralLuzon,
    #[serde(rename = "R4A")]
    Calabarzon,
    #[serde(rename = "R4B")]
    Mimaropa,
    #[serde(rename = "R5")]
    Bicol,
    #[serde(rename = "R6")]
    WesternVisayas,
    #[serde(rename = "R7")]
    CentralVisayas,
    #[serde(rename = "R8")]
    EasternVisayas,
    #[serde(rename = "R9")]
    ZamboangaPeninsula,
    #[serde(rename = "R10")]
    NorthernMindanao,
    #[serde(rename = "R11")]
    Davao,
    #[serde(rename = "R12")]
    Soccsksargen,
    #[serde(rename = "R13")]
    Caraga,
    #[serde(rename = "BARMM")]
    Barmm,
}

impl Region {
    /// Every region, in catalog order.
    pub const ALL: [Self; 17] = [
        Self::Ncr,
        Self::Car,
        Self::IlocosRegion,
        Self::CagayanValley,
        Self::CentralLuzon,
        Self::Calabarzon,
        Self::Mimaropa,
        Self::Bicol,
        Self::WesternVisayas,
        Self::CentralVisayas,
        Self::EasternVisayas,
        Self::ZamboangaPeninsula,
        Self::NorthernMindanao,
        Self::Davao,
        Self::Soccsksargen,
        Self::Caraga,
        Self::Barmm,
    ];

    /// Short alias used in stored records and form values.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Ncr => "NCR",
            Self::Car => "CAR",
            Self::IlocosRegion => "R1",
            Self::CagayanValley => "R2",
            Self::CentralLuzon => "R3",
            Self::Calabarzon => "R4A",
            Self::Mimaropa => "R4B",
            Self::Bicol => "R5",
            Self::WesternVisayas => "R6",
            Self::CentralVisayas => "R7",
            Self::EasternVisayas => "R8",
            Self::ZamboangaPeninsula => "R9",
            Self::NorthernMindanao => "R10",
            Self::Davao => "R11",
            Self::Soccsksargen => "R12",
            Self::Caraga => "R13",
            Self::Barmm => "BARMM",
        }
    }

    /// Philippine Statistics Authority region code.
    #[must_use]
    pub const fn psa_code(self) -> &'static str {
        match self {
            Self::Ncr => "130000000",
            Self::Car => "140000000",
            Self::IlocosRegion => "010000000",
            Self::CagayanValley => "020000000",
            Self::CentralLuzon => "030000000",
            Self::Calabarzon => "040000000",
            Self::Mimaropa => "170000000",
            Self::Bicol => "050000000",
            Self::WesternVisayas => "060000000",
            Self::CentralVisayas => "070000000",
            Self::EasternVisayas => "080000000",
            Self::ZamboangaPeninsula => "090000000",
            Self::NorthernMindanao => "100000000",
            Self::Davao => "110000000",
            Self::Soccsksargen => "120000000",
            Self::Caraga => "160000000",
            Self::Barmm => "150000000",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ncr => "National Capital Region",
            Self::Car => "Cordillera Administrative Region",
            Self::IlocosRegion => "Region I (Ilocos Region)",
            Self::CagayanValley => "Region II (Cagayan Valley)",
            Self::CentralLuzon => "Region III (Central Luzon)",
            Self::Calabarzon => "Region IV-A (CALABARZON)",
            Self::Mimaropa => "MIMAROPA Region",
            Self::Bicol => "Region V (Bicol Region)",
            Self::WesternVisayas => "Region VI (Western Visayas)",
            Self::CentralVisayas => "Region VII (Central Visayas)",
            Self::EasternVisayas => "Region VIII (Eastern Visayas)",
            Self::ZamboangaPeninsula => "Region IX (Zamboanga Peninsula)",
            Self::NorthernMindanao => "Region X (Northern Mindanao)",
            Self::Davao => "Region XI (Davao Region)",
            Self::Soccsksargen => "Region XII (SOCCSKSARGEN)",
            Self::Caraga => "Region XIII (Caraga)",
            Self::Barmm => "Bangsamoro Autonomous Region in Muslim Mindanao",
        }
    }

    /// Whether the region is divided into provinces. Only NCR is not.
    #[must_use]
    pub const fn has_provinces(self) -> bool {
        !matches!(self, Self::Ncr)
    }

    /// Parse an alias (`"R4A"`) or a PSA code (`"040000000"`).
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if the value matches no region.
    pub fn parse(s: &str) -> Result<Self, RegionError> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.alias() == s || region.psa_code() == s)
            .ok_or_else(|| RegionError(s.to_owned()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

impl std::str::FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Region {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Region {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Region {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.alias(), buf)
    }
}
