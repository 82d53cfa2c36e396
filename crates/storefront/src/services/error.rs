//! Service error types.

use thiserror::Error;

use tindahan_core::validation::{FormError, ValidationErrors};

use crate::db::RepositoryError;

/// Errors that can occur in storefront services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The submission has field errors to show the user.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// The record the operation targets does not exist.
    #[error("not found")]
    NotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl ServiceError {
    /// Field errors, if this is a validation failure.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

impl From<FormError<RepositoryError>> for ServiceError {
    fn from(err: FormError<RepositoryError>) -> Self {
        match err {
            FormError::Invalid(errors) => Self::Invalid(errors),
            FormError::Lookup(err) => err.into(),
        }
    }
}
