//! Shipping address edits for existing customers.

use sqlx::PgPool;
use tracing::{debug, info, instrument};

use tindahan_core::UserId;
use tindahan_core::validation::{
    AddressChoices, AddressResolver, FormData, LocationCatalog, PhilippineRegions, Requiredness,
};

use super::ServiceError;
use crate::db::customers::CustomerRepository;
use crate::models::Customer;

/// Customer profile service.
pub struct CustomerService<'a, C = PhilippineRegions> {
    customers: CustomerRepository<'a>,
    resolver: AddressResolver<C>,
}

impl<'a> CustomerService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self::with_catalog(pool, PhilippineRegions)
    }
}

impl<'a, C: LocationCatalog> CustomerService<'a, C> {
    #[must_use]
    pub const fn with_catalog(pool: &'a PgPool, catalog: C) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            resolver: AddressResolver::new(catalog),
        }
    }

    /// Choices and requiredness for the initial render of the edit form,
    /// seeded from the stored address.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user has no customer profile.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn shipping_address_form(
        &self,
        user_id: UserId,
    ) -> Result<(AddressChoices, Requiredness), ServiceError> {
        let customer = self.load(user_id).await?;
        Ok(self
            .resolver
            .render_state(&FormData::new(), &customer.prior_form_data()))
    }

    /// Validate an edited shipping address and store it.
    ///
    /// The stored address is the prior render and its mobile number is kept.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` with every field error, or
    /// `ServiceError::NotFound` if the user has no customer profile.
    #[instrument(skip(self, submitted), fields(user_id = %user_id))]
    pub async fn update_shipping_address(
        &self,
        user_id: UserId,
        submitted: &FormData,
    ) -> Result<Customer, ServiceError> {
        let customer = self.load(user_id).await?;

        let address = self
            .resolver
            .resolve_edit(submitted, customer.address.as_ref())
            .into_result()
            .inspect_err(|errors| debug!(%errors, "shipping address rejected"))?;

        let updated = self.customers.update_address(user_id, &address).await?;
        info!(customer_id = %updated.id, region = %address.region, "shipping address updated");
        Ok(updated)
    }

    async fn load(&self, user_id: UserId) -> Result<Customer, ServiceError> {
        self.customers
            .get_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }
}
