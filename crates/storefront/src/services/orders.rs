//! Checkout and staff order edits.

use sqlx::PgPool;
use tracing::{debug, instrument};

use tindahan_core::validation::{CheckoutContact, FormData, OrderUpdate};
use tindahan_core::{Clock, CustomerId, OrderId, StatusStamp, SystemClock};

use super::ServiceError;
use crate::db::orders::OrderRepository;
use crate::models::Order;

/// Order service.
pub struct OrderService<'a, K = SystemClock> {
    orders: OrderRepository<'a, K>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }
}

impl<'a, K: Clock> OrderService<'a, K> {
    #[must_use]
    pub const fn with_clock(pool: &'a PgPool, clock: K) -> Self {
        Self {
            orders: OrderRepository::with_clock(pool, clock),
        }
    }

    #[must_use]
    pub const fn repository(&self) -> &OrderRepository<'a, K> {
        &self.orders
    }

    /// Validate the checkout contact form and place a `Pending` order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` with every field error.
    #[instrument(skip(self, submitted))]
    pub async fn place_order(
        &self,
        customer_id: Option<CustomerId>,
        submitted: &FormData,
    ) -> Result<Order, ServiceError> {
        let contact = CheckoutContact::from_form(submitted)
            .inspect_err(|errors| debug!(%errors, "checkout rejected"))?;
        Ok(self.orders.create(customer_id, &contact).await?)
    }

    /// Validate a staff edit and apply it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` with every field error, or
    /// `ServiceError::NotFound` if the order does not exist.
    #[instrument(skip(self, submitted), fields(order_id = %id))]
    pub async fn update_order(
        &self,
        id: OrderId,
        submitted: &FormData,
    ) -> Result<(Order, StatusStamp), ServiceError> {
        let update = OrderUpdate::from_form(submitted)
            .inspect_err(|errors| debug!(%errors, "order update rejected"))?;
        Ok(self.orders.update(id, &update).await?)
    }
}
