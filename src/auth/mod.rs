//! Backend-agnostic authentication service.
//!
//! Two interchangeable implementations sit behind [`AuthBackend`]:
//! [`MockAuthService`] for development and tests, and [`HostedAuthService`]
//! backed by the hosted identity and profile services. [`select_backend`]
//! picks one from configuration; select once at startup and share the `Arc`,
//! since the two backends hold independent session state.

mod error;
mod events;
pub mod hosted;
pub mod mock;
mod session;

pub use error::{AuthError, AuthResult};
pub use events::{AuthEvent, AuthEventBus, AuthSubscription, SessionSnapshot};
pub use hosted::HostedAuthService;
pub use mock::MockAuthService;
pub use session::SessionStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{AuthSession, LoginCredentials, SignupCredentials, User};
use crate::validation::{self, PasswordCheck};

#[async_trait]
pub trait AuthBackend: Send + Sync + std::fmt::Debug {
    /// Authenticate with email and password, establishing a new session.
    /// An existing session is replaced, not stacked.
    async fn login(&self, credentials: &LoginCredentials) -> AuthResult<AuthSession>;

    /// Create an account and establish a session for it
    async fn signup(&self, credentials: &SignupCredentials) -> AuthResult<AuthSession>;

    /// Tear down the current session. Succeeds when no session exists.
    async fn logout(&self) -> AuthResult<()>;

    /// The currently signed-in ranger, if any
    async fn current_user(&self) -> Option<User>;

    /// The current session token, if any
    async fn auth_token(&self) -> Option<String>;

    async fn is_authenticated(&self) -> bool;

    /// Ask the backend to send a password-reset email. The result does not
    /// reveal whether the address has an account.
    async fn reset_password(&self, email: &str) -> AuthResult<()>;

    /// Fetch a ranger profile by user id
    async fn user_profile(&self, user_id: &str) -> AuthResult<Option<User>>;

    fn validate_email(&self, email: &str) -> bool {
        validation::validate_email(email)
    }

    fn validate_password(&self, password: &str) -> PasswordCheck {
        validation::validate_password(password)
    }

    fn validate_ranger_id(&self, ranger_id: &str) -> bool {
        validation::validate_ranger_id(ranger_id)
    }
}

/// Pick the auth backend from configuration.
///
/// Read once at startup; the two implementations hold independent and
/// incompatible session state, so re-selecting per call would lose sessions.
pub fn select_backend(config: &Config) -> AuthResult<Arc<dyn AuthBackend>> {
    if config.backend.use_hosted {
        let service = HostedAuthService::from_config(&config.hosted)?;
        tracing::info!("using hosted auth backend");
        Ok(Arc::new(service))
    } else {
        tracing::info!("using mock auth backend");
        Ok(Arc::new(MockAuthService::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_mock_backend_by_default() {
        let config = Config::default();
        let backend = select_backend(&config).unwrap();
        // Trait-provided validators are reachable through the object
        assert!(backend.validate_email("a@b.com"));
        assert!(backend.validate_ranger_id("ABC-123"));
        assert!(!backend.validate_password("abc").is_valid);
    }

    #[test]
    fn test_hosted_backend_requires_configuration() {
        let mut config = Config::default();
        config.backend.use_hosted = true;

        let err = select_backend(&config).unwrap_err();
        assert_eq!(err, AuthError::NotConfigured);
    }

    #[tokio::test]
    async fn test_configured_hosted_backend_starts_anonymous() {
        let mut config = Config::default();
        config.backend.use_hosted = true;
        config.hosted.url = Some("https://project.example.co".to_string());
        config.hosted.anon_key = Some("anon-key".to_string());

        let backend = select_backend(&config).unwrap();
        assert!(!backend.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_mock_backend_full_session_roundtrip_through_trait_object() {
        let config = Config::default();
        let backend = select_backend(&config).unwrap();

        let session = backend
            .login(&LoginCredentials {
                email: "sarah.johnson@safarimap.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(backend.auth_token().await, Some(session.token));
        backend.logout().await.unwrap();
        assert!(!backend.is_authenticated().await);
    }
}
