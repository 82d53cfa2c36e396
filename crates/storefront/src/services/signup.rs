//! Customer registration.
//!
//! Both signup flows end in [`SignupService::register`], which hashes the
//! password and creates the account and customer profile in one
//! transaction. The form checks for duplicate usernames and emails are
//! advisory; a registration that loses a race is caught by the unique
//! constraints and reported with the same field errors.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use tindahan_core::validation::{
    AccountSecurity, AddressResolver, CredentialValidator, CustomerSignup, CustomerSignupForm,
    FormData, FormError, LocationCatalog, PersonalInformation, PhilippineRegions,
    ValidationError, ValidationErrors,
};

use super::ServiceError;
use crate::db::RepositoryError;
use crate::db::customers::CustomerRepository;
use crate::db::users::{EMAIL_CONSTRAINT, NewUser, USERNAME_CONSTRAINT, UserRepository};
use crate::models::{Customer, User};

/// The account and profile created by a registration.
#[derive(Debug, Clone)]
pub struct RegisteredCustomer {
    pub user: User,
    pub customer: Customer,
}

/// The three pages of the step-based signup, as submitted.
#[derive(Debug, Clone, Default)]
pub struct SignupSteps {
    pub personal: FormData,
    pub security: FormData,
    pub shipping: FormData,
}

/// Registration service.
pub struct SignupService<'a, C = PhilippineRegions> {
    pool: &'a PgPool,
    catalog: C,
}

impl<'a> SignupService<'a> {
    /// Create a signup service offering every Philippine region.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self::with_catalog(pool, PhilippineRegions)
    }
}

impl<'a, C: LocationCatalog> SignupService<'a, C> {
    #[must_use]
    pub const fn with_catalog(pool: &'a PgPool, catalog: C) -> Self {
        Self { pool, catalog }
    }

    /// Validate and register a single-page signup.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` with every field error, including
    /// duplicates detected at insert time.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        submitted: &FormData,
        prior: &FormData,
    ) -> Result<RegisteredCustomer, ServiceError> {
        let form = CustomerSignupForm::new(UserRepository::new(self.pool), &self.catalog);
        let signup = form
            .validate(submitted, prior)
            .await
            .inspect_err(log_rejection)?;

        self.register(&signup).await
    }

    /// Validate all three signup steps and register the result.
    ///
    /// Errors from every step are reported together.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` with every field error.
    #[instrument(skip_all)]
    pub async fn submit_steps(&self, steps: &SignupSteps) -> Result<RegisteredCustomer, ServiceError> {
        let mut errors = ValidationErrors::new();

        let personal = PersonalInformation::from_form(&steps.personal)
            .map_err(|e| errors.extend(e))
            .ok();

        let credentials = CredentialValidator::new(UserRepository::new(self.pool));
        let security = match AccountSecurity::from_form(&steps.security, &credentials).await {
            Ok(security) => Some(security),
            Err(FormError::Invalid(e)) => {
                errors.extend(e);
                None
            }
            Err(FormError::Lookup(e)) => return Err(e.into()),
        };

        let address = AddressResolver::new(&self.catalog)
            .resolve(&steps.shipping, &FormData::new())
            .into_result()
            .map_err(|e| errors.extend(e))
            .ok();

        match (personal, security, address) {
            (Some(personal), Some(security), Some(address)) => {
                let signup = CustomerSignup::from_steps(personal, security, address);
                self.register(&signup).await
            }
            _ => {
                let err = FormError::Invalid(errors);
                log_rejection(&err);
                Err(err.into())
            }
        }
    }

    /// Create the account and customer profile for a validated signup.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` with `DuplicateUsername` or
    /// `DuplicateEmail` if a concurrent registration claimed the name first.
    /// Returns `ServiceError::PasswordHash` if hashing fails.
    #[instrument(skip_all, fields(username = %signup.username))]
    pub async fn register(&self, signup: &CustomerSignup) -> Result<RegisteredCustomer, ServiceError> {
        let password_hash = hash_password(signup.password())?;

        let mut tx = self.pool.begin().await?;

        let user = UserRepository::create(
            &mut tx,
            &NewUser {
                username: &signup.username,
                email: signup.email.as_ref(),
                first_name: &signup.first_name,
                last_name: &signup.last_name,
                password_hash: &password_hash,
            },
        )
        .await
        .map_err(translate_conflict)?;

        let customer = CustomerRepository::create(&mut tx, user.id, &signup.address).await?;

        tx.commit().await?;

        info!(user_id = %user.id, customer_id = %customer.id, "customer account created");
        Ok(RegisteredCustomer { user, customer })
    }
}

fn log_rejection(err: &FormError<RepositoryError>) {
    if let FormError::Invalid(errors) = err {
        debug!(error_count = errors.len(), %errors, "signup rejected");
    }
}

/// Translate a unique violation on the account table into the field error
/// the form check would have produced.
fn translate_conflict(err: RepositoryError) -> ServiceError {
    let duplicate = match err.conflict_constraint() {
        Some(USERNAME_CONSTRAINT) => ValidationError::DuplicateUsername,
        Some(EMAIL_CONSTRAINT) => ValidationError::DuplicateEmail,
        _ => return err.into(),
    };
    warn!(constraint = ?err.conflict_constraint(), "duplicate caught by unique constraint");
    ServiceError::Invalid(duplicate.into())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServiceError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("Mabuhay1!").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"Mabuhay1!", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"mabuhay1!", &parsed)
                .is_err()
        );
    }

    #[test]
    fn test_hash_password_is_salted() {
        assert_ne!(
            hash_password("Mabuhay1!").unwrap(),
            hash_password("Mabuhay1!").unwrap()
        );
    }

    #[test]
    fn test_translate_conflict() {
        let err = translate_conflict(RepositoryError::Conflict(USERNAME_CONSTRAINT.to_owned()));
        assert_eq!(
            err.validation_errors().unwrap().clone().into_vec(),
            vec![ValidationError::DuplicateUsername]
        );

        let err = translate_conflict(RepositoryError::Conflict(EMAIL_CONSTRAINT.to_owned()));
        assert!(
            err.validation_errors()
                .unwrap()
                .contains(&ValidationError::DuplicateEmail)
        );

        let err = translate_conflict(RepositoryError::Conflict("customer_user_id_key".to_owned()));
        assert!(matches!(err, ServiceError::Repository(_)));
    }
}
