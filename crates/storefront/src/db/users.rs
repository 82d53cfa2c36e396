//! User repository for database operations.
//!
//! Also serves as the [`UserDirectory`] that signup forms consult for
//! username and email uniqueness.

use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use tindahan_core::validation::UserDirectory;
use tindahan_core::{Email, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::User;

/// Unique constraint on `user_account.username`.
pub const USERNAME_CONSTRAINT: &str = "user_account_username_key";

/// Unique constraint on `user_account.email`.
pub const EMAIL_CONSTRAINT: &str = "user_account_email_key";

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, created_at, updated_at";

/// Fields for a new `user_account` row.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a Email>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

/// Repository for user database operations.
#[derive(Debug, Clone, Copy)]
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get the stored password hash for a username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_password_hash(&self, username: &str) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM user_account WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }

    /// Insert a user on an existing connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming [`USERNAME_CONSTRAINT`] or
    /// [`EMAIL_CONSTRAINT`] when the username or email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(conn, new), fields(username = %new.username))]
    pub async fn create(conn: &mut PgConnection, new: &NewUser<'_>) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO user_account (username, email, first_name, last_name, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new.username)
        .bind(new.email)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.password_hash)
        .fetch_one(conn)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }
}

impl UserDirectory for UserRepository<'_> {
    type Error = RepositoryError;

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_account WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_account WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}
