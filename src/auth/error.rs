//! Error taxonomy for authentication operations.
//!
//! Failures are ordinary values: every public operation returns [`AuthResult`]
//! and none panics on user input. Messages are the fixed strings shown to the
//! ranger. Transport detail is logged where the failure is observed and never
//! carried in the returned error.

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No account matches the supplied email
    #[error("User not found")]
    UserNotFound,

    /// The account exists but the password is wrong. The hosted identity
    /// service does not distinguish this from an unknown email, so hosted
    /// credential rejections also land here.
    #[error("Invalid password")]
    InvalidPassword,

    /// The account has been soft-deactivated
    #[error("Account is deactivated")]
    AccountDisabled,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Ranger ID already exists")]
    DuplicateRangerId,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    /// The credential check succeeded but the profile row could not be read
    #[error("Failed to fetch user profile")]
    ProfileFetch,

    /// Signup created the account but neither the server-side trigger nor the
    /// fallback RPC produced a profile row
    #[error("Account created but profile setup did not complete. Please try again")]
    ProfileSetup,

    /// The hosted backend could not be reached or answered with garbage
    #[error("Authentication service request failed")]
    Transport,

    /// The hosted backend was selected but its endpoint or key is missing
    #[error("Hosted backend is not configured")]
    NotConfigured,
}

impl AuthError {
    /// Whether the failure was detected locally, before any remote call
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::PasswordMismatch | AuthError::WeakPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
        assert_eq!(AuthError::InvalidPassword.to_string(), "Invalid password");
        assert_eq!(
            AuthError::DuplicateEmail.to_string(),
            "User with this email already exists"
        );
        assert_eq!(
            AuthError::DuplicateRangerId.to_string(),
            "Ranger ID already exists"
        );
        assert_eq!(
            AuthError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
        assert_eq!(
            AuthError::WeakPassword.to_string(),
            "Password must be at least 6 characters"
        );
        assert_eq!(
            AuthError::ProfileFetch.to_string(),
            "Failed to fetch user profile"
        );
    }

    #[test]
    fn test_setup_failure_is_not_a_validation_error() {
        assert!(AuthError::PasswordMismatch.is_validation());
        assert!(AuthError::WeakPassword.is_validation());
        assert!(!AuthError::ProfileSetup.is_validation());
        assert!(!AuthError::Transport.is_validation());
    }
}
