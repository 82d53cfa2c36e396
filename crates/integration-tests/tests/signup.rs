//! Integration tests for customer registration.
//!
//! These tests require a running `PostgreSQL` database
//! (`STOREFRONT_DATABASE_URL`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use tindahan_core::Region;
use tindahan_core::validation::{
    CustomerSignupForm, Field, FormData, PhilippineRegions, UserDirectory, ValidationError,
};
use tindahan_integration_tests::{TestContext, signup_form, unique_username};
use tindahan_storefront::ServiceError;
use tindahan_storefront::db::customers::CustomerRepository;
use tindahan_storefront::db::users::UserRepository;
use tindahan_storefront::services::{SignupService, SignupSteps};

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_single_page_signup_creates_account_and_address() {
    let ctx = TestContext::new().await;
    let username = unique_username("signup");

    let registered = SignupService::new(&ctx.pool)
        .submit(&signup_form(&username), &FormData::new())
        .await
        .unwrap();

    assert_eq!(registered.user.username, username);
    let address = registered.customer.address.expect("address stored");
    assert_eq!(address.region, Region::Calabarzon);
    assert_eq!(address.mobile.unwrap().as_str(), "956 837 0169");

    let users = UserRepository::new(&ctx.pool);
    assert!(users.username_exists(&username).await.unwrap());
    let hash = users.get_password_hash(&username).await.unwrap().unwrap();
    assert!(hash.starts_with("$argon2id$"));

    let stored = users.get_by_username(&username).await.unwrap().unwrap();
    assert_eq!(stored.id, registered.user.id);
    assert_eq!(stored.full_name(), registered.user.full_name());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_duplicate_username_reported_by_form() {
    let ctx = TestContext::new().await;
    let username = unique_username("dup");
    let service = SignupService::new(&ctx.pool);

    service
        .submit(&signup_form(&username), &FormData::new())
        .await
        .unwrap();

    let again = signup_form(&username).with(Field::Email, format!("other.{username}@example.ph"));
    let err = service.submit(&again, &FormData::new()).await.unwrap_err();
    let errors = err.validation_errors().expect("field errors");
    assert!(errors.contains(&ValidationError::DuplicateUsername));
    assert!(!errors.contains(&ValidationError::DuplicateEmail));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_unique_constraint_is_the_fallback() {
    let ctx = TestContext::new().await;
    let username = unique_username("race");
    let service = SignupService::new(&ctx.pool);

    let first = service
        .submit(&signup_form(&username), &FormData::new())
        .await
        .unwrap();
    assert_eq!(first.user.username, username);

    // Validated as if the first registration had not landed yet
    let late_form =
        signup_form(&username).with(Field::Email, format!("late.{username}@example.ph"));
    let late = CustomerSignupForm::new(EmptyDirectory, PhilippineRegions)
        .validate(&late_form, &FormData::new())
        .await
        .unwrap();

    let err = service.register(&late).await.unwrap_err();
    match err {
        ServiceError::Invalid(errors) => {
            assert!(errors.contains(&ValidationError::DuplicateUsername));
        }
        other => panic!("expected a duplicate username, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_step_signup_without_email() {
    let ctx = TestContext::new().await;
    let username = unique_username("steps");
    let form = signup_form(&username);

    let steps = SignupSteps {
        personal: form.clone(),
        security: form.clone().with(Field::Email, ""),
        shipping: form.with(Field::Mobile, ""),
    };
    let registered = SignupService::new(&ctx.pool)
        .submit_steps(&steps)
        .await
        .unwrap();

    assert!(registered.user.email.is_none());
    let customer = CustomerRepository::new(&ctx.pool)
        .get_by_user(registered.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        customer.address.unwrap().mobile.unwrap().as_str(),
        "956 837 0169"
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_step_signup_collects_errors_from_all_steps() {
    let ctx = TestContext::new().await;
    let steps = SignupSteps {
        personal: FormData::new().with(Field::Mobile, "9568370169"),
        security: FormData::new().with(Field::Username, unique_username("bad")),
        shipping: FormData::new().with(Field::Region, "R7"),
    };

    let err = SignupService::new(&ctx.pool)
        .submit_steps(&steps)
        .await
        .unwrap_err();
    let errors = err.validation_errors().expect("field errors");
    assert!(errors.has_field(Field::FirstName));
    assert!(errors.has_field(Field::Mobile));
    assert!(errors.has_field(Field::Password));
    assert!(errors.contains(&ValidationError::PrivacyPolicyNotAccepted));
    assert!(errors.contains(&ValidationError::MissingRequiredField(Field::Province)));
}

/// A directory that has never heard of anyone.
struct EmptyDirectory;

#[derive(Debug)]
struct Never;

impl std::fmt::Display for Never {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("never")
    }
}

impl std::error::Error for Never {}

impl UserDirectory for EmptyDirectory {
    type Error = Never;

    async fn username_exists(&self, _username: &str) -> Result<bool, Never> {
        Ok(false)
    }

    async fn email_exists(&self, _email: &str) -> Result<bool, Never> {
        Ok(false)
    }
}
