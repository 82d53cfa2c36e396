//! Username, email and password checks for new accounts.

use std::future::Future;

use super::error::{ValidationError, ValidationErrors};
use super::form::Field;
use crate::types::{Email, check_strength};

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Existence checks against the live account store.
///
/// Lookups are exact and case-sensitive. A `false` answer is advisory: a
/// concurrent registration can still claim the name before the insert, so
/// the store's unique constraints remain the final word.
pub trait UserDirectory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn username_exists(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    fn email_exists(&self, email: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Raw credential input from a signup form.
///
/// `email` is `None` on forms that do not collect one.
#[derive(Clone, Copy)]
pub struct CredentialInput<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

impl std::fmt::Debug for CredentialInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// Checks credentials, collecting every violation rather than stopping at
/// the first.
#[derive(Debug, Clone)]
pub struct CredentialValidator<D> {
    directory: D,
}

impl<D: UserDirectory> CredentialValidator<D> {
    #[must_use]
    pub const fn new(directory: D) -> Self {
        Self { directory }
    }

    #[must_use]
    pub const fn directory(&self) -> &D {
        &self.directory
    }

    /// Validate one set of credentials.
    ///
    /// Blank fields yield `MissingRequiredField`; a username or email is only
    /// looked up once it is well-formed. Password strength and confirmation
    /// are checked regardless of the lookups.
    ///
    /// # Errors
    ///
    /// Returns the directory's error if a lookup fails. Validation problems
    /// are not errors here: they come back in the (possibly empty) list.
    pub async fn validate(
        &self,
        input: &CredentialInput<'_>,
    ) -> Result<ValidationErrors, D::Error> {
        let mut errors = ValidationErrors::new();

        let username = input.username.trim();
        if username.is_empty() {
            errors.push(ValidationError::MissingRequiredField(Field::Username));
        } else if username.chars().count() > USERNAME_MAX_LENGTH {
            errors.push(ValidationError::FieldTooLong {
                field: Field::Username,
                max: USERNAME_MAX_LENGTH,
            });
        } else if self.directory.username_exists(username).await? {
            errors.push(ValidationError::DuplicateUsername);
        }

        if let Some(email) = input.email.map(str::trim) {
            if email.is_empty() {
                errors.push(ValidationError::MissingRequiredField(Field::Email));
            } else {
                match Email::parse(email) {
                    Err(err) => errors.push(ValidationError::InvalidEmail(err)),
                    Ok(email) => {
                        if self.directory.email_exists(email.as_str()).await? {
                            errors.push(ValidationError::DuplicateEmail);
                        }
                    }
                }
            }
        }

        if input.password.is_empty() {
            errors.push(ValidationError::MissingRequiredField(Field::Password));
        } else if let Err(weak) = check_strength(input.password) {
            errors.push(weak);
        }

        if input.confirm_password.is_empty() {
            errors.push(ValidationError::MissingRequiredField(Field::ConfirmPassword));
        } else if input.password != input.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }

        Ok(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::PasswordRequirement;

    #[derive(Debug, thiserror::Error)]
    #[error("directory offline")]
    pub struct Offline;

    /// In-memory directory that counts lookups.
    #[derive(Default)]
    pub struct MemoryDirectory {
        pub usernames: HashSet<String>,
        pub emails: HashSet<String>,
        pub offline: bool,
        pub lookups: AtomicUsize,
    }

    impl MemoryDirectory {
        pub fn with_user(username: &str, email: &str) -> Self {
            Self {
                usernames: HashSet::from([username.to_owned()]),
                emails: HashSet::from([email.to_owned()]),
                ..Self::default()
            }
        }
    }

    impl UserDirectory for MemoryDirectory {
        type Error = Offline;

        async fn username_exists(&self, username: &str) -> Result<bool, Offline> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            if self.offline {
                return Err(Offline);
            }
            Ok(self.usernames.contains(username))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, Offline> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            if self.offline {
                return Err(Offline);
            }
            Ok(self.emails.contains(email))
        }
    }

    fn input<'a>(username: &'a str, email: &'a str, password: &'a str) -> CredentialInput<'a> {
        CredentialInput {
            username,
            email: Some(email),
            password,
            confirm_password: password,
        }
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let validator = CredentialValidator::new(MemoryDirectory::default());
        let errors = validator
            .validate(&input("juan", "juan@example.ph", "Abcdef1!"))
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_reported_with_weak_password() {
        let validator =
            CredentialValidator::new(MemoryDirectory::with_user("juan", "old@example.ph"));
        let errors = validator
            .validate(&input("juan", "new@example.ph", "abc12345"))
            .await
            .unwrap();

        assert!(errors.contains(&ValidationError::DuplicateUsername));
        let weak = errors
            .iter()
            .find_map(|e| match e {
                ValidationError::WeakPassword(weak) => Some(weak),
                _ => None,
            })
            .unwrap();
        assert!(weak.is_missing(PasswordRequirement::Uppercase));
        assert!(weak.is_missing(PasswordRequirement::Symbol));
        assert!(!errors.contains(&ValidationError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_duplicate_username_with_strong_password() {
        let validator =
            CredentialValidator::new(MemoryDirectory::with_user("juan", "old@example.ph"));
        let errors = validator
            .validate(&input("juan", "new@example.ph", "Abcdef1!"))
            .await
            .unwrap();
        assert_eq!(errors.into_vec(), vec![ValidationError::DuplicateUsername]);
    }

    #[tokio::test]
    async fn test_username_match_is_case_sensitive() {
        let validator =
            CredentialValidator::new(MemoryDirectory::with_user("juan", "juan@example.ph"));
        let errors = validator
            .validate(&input("Juan", "Juan@example.ph", "Abcdef1!"))
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let validator =
            CredentialValidator::new(MemoryDirectory::with_user("juan", "juan@example.ph"));
        let errors = validator
            .validate(&input("maria", "juan@example.ph", "Abcdef1!"))
            .await
            .unwrap();
        assert_eq!(errors.into_vec(), vec![ValidationError::DuplicateEmail]);
    }

    #[tokio::test]
    async fn test_malformed_email_is_not_looked_up() {
        let validator = CredentialValidator::new(MemoryDirectory::default());
        let errors = validator
            .validate(&input("maria", "not-an-email", "Abcdef1!"))
            .await
            .unwrap();
        assert!(errors.has_field(Field::Email));
        assert_eq!(validator.directory().lookups.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_mismatch_and_missing_fields_collected() {
        let validator = CredentialValidator::new(MemoryDirectory::default());
        let errors = validator
            .validate(&CredentialInput {
                username: "  ",
                email: None,
                password: "Abcdef1!",
                confirm_password: "Abcdef1?",
            })
            .await
            .unwrap();
        assert_eq!(
            errors.into_vec(),
            vec![
                ValidationError::MissingRequiredField(Field::Username),
                ValidationError::PasswordMismatch,
            ]
        );
        assert_eq!(validator.directory().lookups.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let validator = CredentialValidator::new(MemoryDirectory {
            offline: true,
            ..MemoryDirectory::default()
        });
        let result = validator
            .validate(&input("juan", "juan@example.ph", "Abcdef1!"))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let text = format!("{:?}", input("juan", "juan@example.ph", "Abcdef1!"));
        assert!(!text.contains("Abcdef1!"));
        assert!(text.contains("juan"));
    }
}
