//! Order domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use tindahan_core::{CustomerId, Email, MobileNumber, OrderId, OrderStatus, StoredStatus};

/// A checkout order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// `None` for guest checkouts and deleted customers.
    pub customer_id: Option<CustomerId>,
    pub contact_email: Email,
    /// Lenient-normalized `09…` digits.
    pub contact_mobile: MobileNumber,
    pub delivery_address: String,
    pub status: OrderStatus,
    /// When `status` last changed, or when the order was created.
    pub status_updated_at: Option<DateTime<Utc>>,
    pub estimated_delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The status columns as the tracker sees them.
    #[must_use]
    pub const fn stored_status(&self) -> StoredStatus {
        StoredStatus {
            status: self.status,
            updated_at: self.status_updated_at,
        }
    }
}
