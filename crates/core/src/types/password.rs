//! Password strength rules for new accounts.

use core::fmt;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols that satisfy the symbol requirement.
pub const PASSWORD_SYMBOLS: [char; 6] = ['!', '@', '#', '$', '%', '*'];

/// One strength rule a password can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRequirement {
    MinLength,
    Uppercase,
    Digit,
    Symbol,
}

impl PasswordRequirement {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MinLength => "Password must be at least 8 characters long.",
            Self::Uppercase => "Password must include at least one uppercase letter.",
            Self::Digit => "Password must include at least one number.",
            Self::Symbol => "Password must include at least one symbol (e.g., !, @, #, $, %, *).",
        }
    }

    fn is_met_by(self, password: &str) -> bool {
        match self {
            Self::MinLength => password.chars().count() >= MIN_PASSWORD_LENGTH,
            Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Symbol => password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)),
        }
    }
}

const ALL_REQUIREMENTS: [PasswordRequirement; 4] = [
    PasswordRequirement::MinLength,
    PasswordRequirement::Uppercase,
    PasswordRequirement::Digit,
    PasswordRequirement::Symbol,
];

/// Every requirement a password failed, in rule order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeakPassword(Vec<PasswordRequirement>);

impl WeakPassword {
    #[must_use]
    pub fn unmet(&self) -> &[PasswordRequirement] {
        &self.0
    }

    #[must_use]
    pub fn is_missing(&self, requirement: PasswordRequirement) -> bool {
        self.0.contains(&requirement)
    }
}

impl fmt::Display for WeakPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for requirement in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(requirement.message())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for WeakPassword {}

/// Check a password against every strength rule.
///
/// # Errors
///
/// Returns [`WeakPassword`] listing all unmet requirements, not just the first.
pub fn check_strength(password: &str) -> Result<(), WeakPassword> {
    let unmet: Vec<_> = ALL_REQUIREMENTS
        .into_iter()
        .filter(|requirement| !requirement.is_met_by(password))
        .collect();

    if unmet.is_empty() {
        Ok(())
    } else {
        Err(WeakPassword(unmet))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes() {
        assert!(check_strength("Abcdef1!").is_ok());
        assert!(check_strength("Mabuhay2026*").is_ok());
    }

    #[test]
    fn test_reports_every_missing_requirement() {
        let weak = check_strength("abc12345").unwrap_err();
        assert_eq!(
            weak.unmet(),
            &[PasswordRequirement::Uppercase, PasswordRequirement::Symbol]
        );
    }

    #[test]
    fn test_short_password() {
        let weak = check_strength("Ab1!").unwrap_err();
        assert_eq!(weak.unmet(), &[PasswordRequirement::MinLength]);
    }

    #[test]
    fn test_symbol_set_is_fixed() {
        // '&' and '^' are not in the accepted set
        let weak = check_strength("Abcdef1&^").unwrap_err();
        assert!(weak.is_missing(PasswordRequirement::Symbol));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Seven characters, more than eight bytes
        let weak = check_strength("Ñiño1!é").unwrap_err();
        assert!(weak.is_missing(PasswordRequirement::MinLength));
    }

    #[test]
    fn test_display_joins_messages() {
        let weak = check_strength("abcdefgh").unwrap_err();
        let text = weak.to_string();
        assert!(text.starts_with("Password must include at least one uppercase letter."));
        assert!(text.contains("one number."));
        assert!(text.ends_with("!, @, #, $, %, *)."));
    }
}
