use thiserror::Error;
use tracing::debug;

use crate::error::{IdentityError, Result};

/// A single password requirement a candidate password can violate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRequirement {
    #[error("must be at least {0} characters long")]
    MinimumLength(usize),
    #[error("must contain at least one digit")]
    Digit,
    #[error("must contain at least one lowercase letter")]
    Lowercase,
    #[error("must contain at least one uppercase letter")]
    Uppercase,
    #[error("must contain at least one non-alphanumeric character")]
    NonAlphanumeric,
}

/// Password complexity rules applied at registration and password change.
///
/// The shop runs with a relaxed policy: five characters minimum, no
/// uppercase and no special character required. Digit and lowercase
/// requirements stay active.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            required_length: 5,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: false,
            require_non_alphanumeric: false,
        }
    }
}

impl PasswordPolicy {
    /// Check a candidate password against every active requirement.
    /// Collects all violations instead of stopping at the first one, so
    /// the caller can report the full list to the user.
    pub fn validate(&self, password: &str) -> Result<()> {
        let mut violations = Vec::new();

        if password.chars().count() < self.required_length {
            violations.push(PasswordRequirement::MinimumLength(self.required_length));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordRequirement::Digit);
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            violations.push(PasswordRequirement::Lowercase);
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            violations.push(PasswordRequirement::Uppercase);
        }
        if self.require_non_alphanumeric && !password.chars().any(|c| !c.is_alphanumeric()) {
            violations.push(PasswordRequirement::NonAlphanumeric);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            debug!("Password rejected, {} requirement(s) violated", violations.len());
            Err(IdentityError::PolicyViolation(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_password_meeting_default_policy() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("games1").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let policy = PasswordPolicy::default();
        let err = policy.validate("ab1").unwrap_err();
        match err {
            IdentityError::PolicyViolation(violations) => {
                assert!(violations.contains(&PasswordRequirement::MinimumLength(5)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_password_without_digit() {
        let policy = PasswordPolicy::default();
        let err = policy.validate("nodigits").unwrap_err();
        match err {
            IdentityError::PolicyViolation(violations) => {
                assert_eq!(violations, vec![PasswordRequirement::Digit]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn does_not_require_uppercase_or_symbols() {
        let policy = PasswordPolicy::default();
        // No uppercase, no special characters, still fine.
        assert!(policy.validate("abcde1").is_ok());
    }

    #[test]
    fn collects_all_violations_at_once() {
        let policy = PasswordPolicy {
            required_length: 8,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        };
        let err = policy.validate("abc").unwrap_err();
        match err {
            IdentityError::PolicyViolation(violations) => {
                assert_eq!(violations.len(), 4);
                assert!(violations.contains(&PasswordRequirement::MinimumLength(8)));
                assert!(violations.contains(&PasswordRequirement::Digit));
                assert!(violations.contains(&PasswordRequirement::Uppercase));
                assert!(violations.contains(&PasswordRequirement::NonAlphanumeric));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn requirement_messages_are_human_readable() {
        assert_eq!(
            PasswordRequirement::MinimumLength(5).to_string(),
            "must be at least 5 characters long"
        );
        assert_eq!(
            PasswordRequirement::Digit.to_string(),
            "must contain at least one digit"
        );
    }
}
