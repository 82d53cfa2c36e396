//! Order management commands.
//!
//! # Usage
//!
//! ```bash
//! td-cli order status 42 "Out for Delivery"
//! ```

use thiserror::Error;
use tracing::info;

use tindahan_core::{OrderId, OrderStatus, StatusStamp};
use tindahan_storefront::ConfigError;
use tindahan_storefront::config::StorefrontConfig;
use tindahan_storefront::db::{self, RepositoryError, orders::OrderRepository};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Order {0} not found")]
    NotFound(OrderId),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Move an order to `status`, stamping the change time if it differs.
///
/// # Errors
///
/// Returns `OrderError::NotFound` if no order has this ID.
pub async fn set_status(order_id: OrderId, status: OrderStatus) -> Result<(), OrderError> {
    let config = StorefrontConfig::from_env()?;

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&config).await?;

    let (order, stamp) = OrderRepository::new(&pool)
        .set_status(order_id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => OrderError::NotFound(order_id),
            other => OrderError::Repository(other),
        })?;

    #[allow(clippy::print_stdout)]
    {
        match stamp {
            StatusStamp::Changed { from, to, at } => {
                println!("Order {}: {from} -> {to} at {at}", order.id);
            }
            StatusStamp::Unchanged(_) | StatusStamp::Created { .. } => {
                println!("Order {} already {}; status stamp kept", order.id, order.status);
            }
        }
    }

    Ok(())
}
