//! Auth backend over the hosted identity and profile services.
//!
//! Holds the remote session in memory and keeps the uniform `User` shape by
//! joining the identity session with the profile store row. Remote failures
//! are logged here in full and degraded to the generic taxonomy before they
//! reach the caller.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use crate::auth::events::{AuthEvent, AuthEventBus, AuthSubscription, SessionSnapshot};
use crate::auth::{AuthBackend, AuthError, AuthResult};
use crate::config::HostedConfig;
use crate::models::{
    avatar_initials, AuthSession, LoginCredentials, SignupCredentials, User, DEFAULT_PARK,
    DEFAULT_ROLE,
};
use crate::remote::{
    IdentityClient, NewProfile, ProfileClient, RemoteError, RemoteSession, SignupMetadata,
};
use crate::validation::MIN_PASSWORD_LEN;

/// How long to give the server-side signup trigger before reading the profile
const PROFILE_TRIGGER_WAIT: Duration = Duration::from_millis(400);

#[derive(Debug)]
pub struct HostedAuthService {
    identity: IdentityClient,
    profiles: ProfileClient,
    session: Mutex<Option<RemoteSession>>,
    events: AuthEventBus,
}

impl HostedAuthService {
    /// Build from the `[hosted]` config section. Fails with `NotConfigured`
    /// when the endpoint URL or key is missing.
    pub fn from_config(config: &HostedConfig) -> AuthResult<Self> {
        let (Some(url), Some(anon_key)) = (&config.url, &config.anon_key) else {
            return Err(AuthError::NotConfigured);
        };
        Ok(Self::new(url, anon_key, &config.profile_table))
    }

    pub fn new(url: &str, anon_key: &str, profile_table: &str) -> Self {
        Self {
            identity: IdentityClient::new(url, anon_key),
            profiles: ProfileClient::new(url, anon_key, profile_table),
            session: Mutex::new(None),
            events: AuthEventBus::new(),
        }
    }

    /// Subscribe to sign-in, sign-out, and token-refresh events
    pub fn on_auth_state_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthEvent, Option<&SessionSnapshot>) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }

    /// Exchange the refresh token for a new session.
    ///
    /// A call with no active session is a no-op; an expired or revoked refresh
    /// token surfaces as a transport failure.
    pub async fn refresh_session(&self) -> AuthResult<()> {
        let refresh_token = self.session.lock().as_ref().map(|s| s.refresh_token.clone());
        let Some(refresh_token) = refresh_token else {
            tracing::debug!("refresh requested with no active session");
            return Ok(());
        };

        match self.identity.refresh(&refresh_token).await {
            Ok(mut session) => {
                // Refresh responses may omit the email; keep the one we had
                if session.email.is_empty() {
                    if let Some(existing) = self.session.lock().as_ref() {
                        session.email = existing.email.clone();
                    }
                }
                self.store_session(session, AuthEvent::TokenRefreshed);
                Ok(())
            }
            Err(error) => Err(map_remote_error(error, "token refresh")),
        }
    }

    fn snapshot(session: &RemoteSession) -> SessionSnapshot {
        SessionSnapshot {
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            access_token: session.access_token.clone(),
        }
    }

    fn store_session(&self, session: RemoteSession, event: AuthEvent) {
        let snapshot = Self::snapshot(&session);
        *self.session.lock() = Some(session);
        self.events.emit(event, Some(&snapshot));
    }

    async fn fetch_user(&self, session: &RemoteSession) -> AuthResult<Option<User>> {
        match self.profiles.fetch(&session.user_id, &session.access_token).await {
            Ok(row) => Ok(row.map(|profile| profile.into_user(&session.email))),
            Err(error) => {
                tracing::error!(error = %error, user_id = %session.user_id, "profile fetch failed");
                Err(AuthError::ProfileFetch)
            }
        }
    }
}

/// Degrade a remote failure to the public taxonomy, logging the detail here
fn map_remote_error(error: RemoteError, operation: &str) -> AuthError {
    tracing::error!(error = %error, operation, "hosted auth request failed");
    AuthError::Transport
}

/// Whether a rejection means the credentials themselves were refused
fn credential_rejection(error: &RemoteError) -> bool {
    matches!(error.status(), Some(400) | Some(401) | Some(422))
}

#[async_trait]
impl AuthBackend for HostedAuthService {
    async fn login(&self, credentials: &LoginCredentials) -> AuthResult<AuthSession> {
        let session = match self
            .identity
            .password_login(&credentials.email, &credentials.password)
            .await
        {
            Ok(session) => session,
            Err(error) if credential_rejection(&error) => {
                tracing::warn!(email = %credentials.email, "credentials rejected by identity service");
                return Err(AuthError::InvalidPassword);
            }
            Err(error) => return Err(map_remote_error(error, "login")),
        };

        // The credential check alone is not enough; without a profile row the
        // login as a whole fails.
        let user = self.fetch_user(&session).await?.ok_or_else(|| {
            tracing::error!(user_id = %session.user_id, "no profile row for authenticated user");
            AuthError::ProfileFetch
        })?;

        let token = session.access_token.clone();
        self.store_session(session, AuthEvent::SignedIn);
        Ok(AuthSession { user, token })
    }

    async fn signup(&self, credentials: &SignupCredentials) -> AuthResult<AuthSession> {
        if credentials.password != credentials.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let ranger_id = credentials.ranger_id.trim().to_uppercase();
        let metadata = SignupMetadata {
            name: credentials.name.clone(),
            role: DEFAULT_ROLE.to_string(),
            ranger_id: ranger_id.clone(),
            team: credentials.team.clone(),
            avatar: avatar_initials(&credentials.name),
        };

        let session = match self
            .identity
            .signup(&credentials.email, &credentials.password, &metadata)
            .await
        {
            Ok(session) => session,
            Err(RemoteError::Rejected { status, message })
                if message.to_lowercase().contains("already") =>
            {
                tracing::warn!(status, "signup rejected: account exists");
                return Err(AuthError::DuplicateEmail);
            }
            Err(error) => return Err(map_remote_error(error, "signup")),
        };

        // The profile row is written by a server-side trigger. Give it a
        // moment, then fall back to creating the row ourselves.
        tokio::time::sleep(PROFILE_TRIGGER_WAIT).await;
        let mut user = self.fetch_user(&session).await.ok().flatten();
        if user.is_none() {
            let profile = NewProfile {
                id: session.user_id.clone(),
                name: credentials.name.clone(),
                role: DEFAULT_ROLE.to_string(),
                ranger_id,
                team: credentials.team.clone(),
                park: DEFAULT_PARK.to_string(),
                avatar: avatar_initials(&credentials.name),
            };
            if let Err(error) = self.profiles.create(&profile, &session.access_token).await {
                tracing::warn!(error = %error, "profile fallback insert failed");
            }
            user = self.fetch_user(&session).await.ok().flatten();
        }

        let Some(user) = user else {
            tracing::error!(user_id = %session.user_id, "profile row missing after trigger wait and fallback");
            return Err(AuthError::ProfileSetup);
        };

        let token = session.access_token.clone();
        self.store_session(session, AuthEvent::SignedIn);
        Ok(AuthSession { user, token })
    }

    async fn logout(&self) -> AuthResult<()> {
        let session = self.session.lock().clone();
        let Some(session) = session else {
            // Logging out with no session is a no-op
            return Ok(());
        };

        match self.identity.logout(&session.access_token).await {
            Ok(()) => {}
            Err(RemoteError::Rejected { status, message }) => {
                // An already-invalid token still means we are signed out
                tracing::warn!(status, message = %message, "sign-out rejected; clearing local session anyway");
            }
            Err(error) => return Err(map_remote_error(error, "logout")),
        }

        *self.session.lock() = None;
        self.events.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        let session = self.session.lock().clone()?;
        self.fetch_user(&session).await.ok().flatten()
    }

    async fn auth_token(&self) -> Option<String> {
        self.session.lock().as_ref().map(|s| s.access_token.clone())
    }

    async fn is_authenticated(&self) -> bool {
        self.session.lock().is_some()
    }

    async fn reset_password(&self, email: &str) -> AuthResult<()> {
        // The outcome is intentionally identical whether or not the address
        // has an account; only transport failures surface.
        match self.identity.recover(email).await {
            Ok(()) => Ok(()),
            Err(RemoteError::Rejected { status, message }) => {
                tracing::debug!(status, message = %message, "recover request rejected");
                Ok(())
            }
            Err(error) => Err(map_remote_error(error, "password reset")),
        }
    }

    async fn user_profile(&self, user_id: &str) -> AuthResult<Option<User>> {
        let session = self.session.lock().clone();
        let Some(session) = session else {
            return Ok(None);
        };

        match self.profiles.fetch(user_id, &session.access_token).await {
            Ok(row) => Ok(row.map(|profile| {
                // Only our own email is known client-side
                let email = if user_id == session.user_id {
                    session.email.clone()
                } else {
                    String::new()
                };
                profile.into_user(&email)
            })),
            Err(error) => {
                tracing::error!(error = %error, user_id, "profile fetch failed");
                Err(AuthError::ProfileFetch)
            }
        }
    }
}
