//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tindahan_core::{Email, UserId};

/// A storefront account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique and case-sensitive.
    pub username: String,
    /// Email address, absent for accounts from the step-based signup.
    pub email: Option<Email>,
    pub first_name: String,
    pub last_name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
