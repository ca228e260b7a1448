//! Input validation for credential and profile fields.
//!
//! These functions are pure: no side effects, and the same input always yields
//! the same result. Form-level orchestration (which field to flag first, when to
//! re-validate) belongs to the caller.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses (local@domain.tld)
    static ref EMAIL_REGEX: Regex = Regex::new(r"^\S+@\S+\.\S+$").unwrap();

    /// Regex for validating ranger IDs (three uppercase letters, dash, three digits)
    static ref RANGER_ID_REGEX: Regex = Regex::new(r"^[A-Z]{3}-\d{3}$").unwrap();
}

/// Minimum accepted password length, inclusive
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum accepted password length, inclusive
pub const MAX_PASSWORD_LEN: usize = 50;

/// Outcome of a password strength check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl PasswordCheck {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    fn invalid(message: &str) -> Self {
        Self {
            is_valid: false,
            message: Some(message.to_string()),
        }
    }
}

/// Validate an email address
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate password length (6-50 characters inclusive)
pub fn validate_password(password: &str) -> PasswordCheck {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return PasswordCheck::invalid("Password must be at least 6 characters");
    }
    if len > MAX_PASSWORD_LEN {
        return PasswordCheck::invalid("Password must be less than 50 characters");
    }
    PasswordCheck::valid()
}

/// Validate a ranger ID (format: ABC-123)
pub fn validate_ranger_id(ranger_id: &str) -> bool {
    RANGER_ID_REGEX.is_match(ranger_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("sarah.johnson@safarimap.com"));
        assert!(validate_email("ranger+field@parks.go.tz"));

        assert!(!validate_email(""));
        assert!(!validate_email(" "));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a.b.com"));
        assert!(!validate_email("@b.com"));
        assert!(!validate_email("a@"));
        assert!(!validate_email("sarah johnson@safarimap.com"));
    }

    #[test]
    fn test_validate_password_bounds() {
        let too_short = validate_password("abcde");
        assert!(!too_short.is_valid);
        assert_eq!(
            too_short.message.as_deref(),
            Some("Password must be at least 6 characters")
        );

        let too_long = validate_password(&"x".repeat(51));
        assert!(!too_long.is_valid);
        assert_eq!(
            too_long.message.as_deref(),
            Some("Password must be less than 50 characters")
        );

        // Both ends of the range are acceptable
        let min = validate_password("abcdef");
        assert!(min.is_valid);
        assert!(min.message.is_none());

        let max = validate_password(&"x".repeat(50));
        assert!(max.is_valid);
        assert!(max.message.is_none());
    }

    #[test]
    fn test_validate_password_counts_characters_not_bytes() {
        // Six multi-byte characters are still six characters
        assert!(validate_password("åäöåäö").is_valid);
    }

    #[test]
    fn test_validate_ranger_id() {
        assert!(validate_ranger_id("ABC-123"));
        assert!(validate_ranger_id("SNP-001"));

        assert!(!validate_ranger_id(""));
        assert!(!validate_ranger_id(" "));
        assert!(!validate_ranger_id("abc-123"));
        assert!(!validate_ranger_id("ABC-12"));
        assert!(!validate_ranger_id("ABCD-123"));
        assert!(!validate_ranger_id("AB1-123"));
        assert!(!validate_ranger_id("ABC123"));
        assert!(!validate_ranger_id("ABC-1234"));
        assert!(!validate_ranger_id(" ABC-123"));
    }

    #[test]
    fn test_validators_are_deterministic() {
        for _ in 0..3 {
            assert!(validate_email("a@b.com"));
            assert!(validate_ranger_id("ABC-123"));
            assert!(validate_password("secret").is_valid);
        }
    }
}
