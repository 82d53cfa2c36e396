//! Customer repository: profiles and their shipping address.
//!
//! A validated [`AddressSelection`] is written column by column. Reading it
//! back yields `None` unless every required column is present.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use tindahan_core::validation::AddressSelection;
use tindahan_core::{CustomerId, MobileNumber, Region, UserId};

use super::RepositoryError;
use crate::models::customer::Customer;

const CUSTOMER_COLUMNS: &str = "id, user_id, mobile, region, province, city_municipality, \
                                barangay, street_address, postal_code, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    user_id: UserId,
    mobile: Option<MobileNumber>,
    region: Option<Region>,
    province: Option<String>,
    city_municipality: Option<String>,
    barangay: Option<String>,
    street_address: Option<String>,
    postal_code: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let postal_code = row
            .postal_code
            .map(u32::try_from)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid postal code in database: {e}"))
            })?;

        let address = match (
            row.region,
            row.province,
            row.city_municipality,
            row.barangay,
            row.street_address,
            postal_code,
        ) {
            (
                Some(region),
                Some(province),
                Some(city_municipality),
                Some(barangay),
                Some(street_address),
                Some(postal_code),
            ) => Some(AddressSelection {
                region,
                province,
                city_municipality,
                barangay,
                street_address,
                postal_code,
                mobile: row.mobile,
            }),
            _ => None,
        };

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn postal_code_column(address: &AddressSelection) -> Result<i32, RepositoryError> {
    i32::try_from(address.postal_code).map_err(|e| {
        RepositoryError::DataCorruption(format!("postal code out of column range: {e}"))
    })
}

/// Repository for customer profiles.
#[derive(Debug, Clone, Copy)]
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the customer profile belonging to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Create the profile for a new account on an existing transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a profile.
    #[instrument(skip(conn, address), fields(user_id = %user_id))]
    pub async fn create(
        conn: &mut PgConnection,
        user_id: UserId,
        address: &AddressSelection,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customer (user_id, mobile, region, province, city_municipality, \
                                   barangay, street_address, postal_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(address.mobile.as_ref())
        .bind(address.region)
        .bind(&address.province)
        .bind(&address.city_municipality)
        .bind(&address.barangay)
        .bind(&address.street_address)
        .bind(postal_code_column(address)?)
        .fetch_one(conn)
        .await
        .map_err(super::map_unique_violation)?;

        Customer::try_from(row)
    }

    /// Replace the stored address of a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no profile.
    #[instrument(skip(self, address), fields(user_id = %user_id))]
    pub async fn update_address(
        &self,
        user_id: UserId,
        address: &AddressSelection,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customer \
             SET mobile = $2, region = $3, province = $4, city_municipality = $5, \
                 barangay = $6, street_address = $7, postal_code = $8, updated_at = now() \
             WHERE user_id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(address.mobile.as_ref())
        .bind(address.region)
        .bind(&address.province)
        .bind(&address.city_municipality)
        .bind(&address.barangay)
        .bind(&address.street_address)
        .bind(postal_code_column(address)?)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Customer::try_from(row)
    }
}
