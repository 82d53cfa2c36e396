//! Customer profile types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tindahan_core::validation::{AddressSelection, FormData};
use tindahan_core::{CustomerId, UserId};

/// A customer profile with its stored shipping address.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    /// `None` until a complete address has been saved.
    pub address: Option<AddressSelection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// The stored address as form values, for the prior render of an edit.
    #[must_use]
    pub fn prior_form_data(&self) -> FormData {
        self.address
            .as_ref()
            .map(AddressSelection::to_form_data)
            .unwrap_or_default()
    }
}
