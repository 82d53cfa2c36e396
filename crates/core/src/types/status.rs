//! Order status values.

use serde::{Deserialize, Serialize};

/// Fulfilment status of an order, as set by staff.
///
/// There is no transition graph: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "order_status"))]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(rename = "Order Confirmed")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "Order Confirmed"))]
    OrderConfirmed,
    Processing,
    #[serde(rename = "Out for Delivery")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "Out for Delivery"))]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::OrderConfirmed,
        Self::Processing,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Label shown to customers and stored in the database.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::OrderConfirmed => "Order Confirmed",
            Self::Processing => "Processing",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}
