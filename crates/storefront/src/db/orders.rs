//! Order repository.
//!
//! Every write goes through an [`OrderStatusTracker`] so `status_updated_at`
//! only moves on creation and on an actual change of status. Updates read
//! the stored status with `FOR UPDATE` in the same transaction as the write.

use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use tindahan_core::validation::{CheckoutContact, OrderUpdate};
use tindahan_core::{
    Clock, CustomerId, OrderId, OrderStatus, OrderStatusTracker, StatusStamp, StoredStatus,
    SystemClock,
};

use super::RepositoryError;
use crate::models::order::Order;

const ORDER_COLUMNS: &str = "id, customer_id, contact_email, contact_mobile, delivery_address, \
                             status, status_updated_at, estimated_delivery_date, notes, \
                             created_at, updated_at";

/// Repository for orders.
#[derive(Debug, Clone, Copy)]
pub struct OrderRepository<'a, K = SystemClock> {
    pool: &'a PgPool,
    tracker: OrderStatusTracker<K>,
}

impl<'a> OrderRepository<'a> {
    /// Repository stamping with wall-clock time.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self::with_clock(pool, SystemClock)
    }
}

impl<'a, K: Clock> OrderRepository<'a, K> {
    #[must_use]
    pub const fn with_clock(pool: &'a PgPool, clock: K) -> Self {
        Self {
            pool,
            tracker: OrderStatusTracker::new(clock),
        }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Orders placed by a customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Place a new `Pending` order, stamped with its creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, contact))]
    pub async fn create(
        &self,
        customer_id: Option<CustomerId>,
        contact: &CheckoutContact,
    ) -> Result<Order, RepositoryError> {
        let stamp = self.tracker.on_save(None, OrderStatus::Pending);

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (customer_id, contact_email, contact_mobile, delivery_address, \
                                 status, status_updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(&contact.email)
        .bind(&contact.mobile)
        .bind(&contact.address)
        .bind(OrderStatus::Pending)
        .bind(stamp.timestamp())
        .fetch_one(self.pool)
        .await?;

        info!(order_id = %order.id, status = %order.status, "order created");
        Ok(order)
    }

    /// Apply a staff edit.
    ///
    /// The stored status is locked and read inside the transaction, so two
    /// concurrent edits cannot both compare against a stale status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, update), fields(order_id = %id, status = %update.status))]
    pub async fn update(
        &self,
        id: OrderId,
        update: &OrderUpdate,
    ) -> Result<(Order, StatusStamp), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let stored = lock_status(&mut tx, id).await?;
        let stamp = self.tracker.on_save(Some(&stored), update.status);

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders \
             SET status = $2, status_updated_at = $3, estimated_delivery_date = $4, \
                 notes = $5, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(update.status)
        .bind(stamp.timestamp())
        .bind(update.estimated_delivery_date)
        .bind(update.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        log_transition(id, &stamp);

        Ok((order, stamp))
    }

    /// Change only the status of an order, leaving the other fields alone.
    ///
    /// # Errors
    ///
    /// Same as [`OrderRepository::update`].
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(Order, StatusStamp), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let stored = lock_status(&mut tx, id).await?;
        let stamp = self.tracker.on_save(Some(&stored), status);

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders \
             SET status = $2, status_updated_at = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(stamp.timestamp())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        log_transition(id, &stamp);

        Ok((order, stamp))
    }
}

/// Read and lock the stored status of an order.
async fn lock_status(conn: &mut PgConnection, id: OrderId) -> Result<StoredStatus, RepositoryError> {
    sqlx::query_as::<_, StoredStatus>(
        "SELECT status, status_updated_at FROM orders WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or(RepositoryError::NotFound)
}

fn log_transition(id: OrderId, stamp: &StatusStamp) {
    if let StatusStamp::Changed { from, to, at } = *stamp {
        info!(order_id = %id, %from, %to, %at, "order status changed");
    }
}
