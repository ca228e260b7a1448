//! In-memory auth backend for development and tests.
//!
//! Mirrors the hosted backend's contract without any network round trips: a
//! fixed ranger registry, argon2-hashed demo passwords, and a single session
//! slot. Each instance owns its own state, so tests can construct isolated
//! services and `reset()` between cases.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::auth::session::{
    generate_token, hash_password, token_fingerprint, verify_password, SessionStore,
};
use crate::auth::{AuthBackend, AuthError, AuthResult};
use crate::models::{
    avatar_initials, AuthSession, LoginCredentials, SignupCredentials, User, DEFAULT_PARK,
    DEFAULT_ROLE,
};
use crate::validation::MIN_PASSWORD_LEN;

/// Registry entry: the account plus its password hash
#[derive(Debug, Clone)]
struct RangerRecord {
    user: User,
    password_hash: String,
}

fn record(
    id: &str,
    name: &str,
    email: &str,
    role: &str,
    ranger_id: &str,
    team: &str,
    join_date: &str,
    is_active: bool,
    password: &str,
) -> RangerRecord {
    RangerRecord {
        user: User {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            ranger_id: ranger_id.to_string(),
            team: team.to_string(),
            park: DEFAULT_PARK.to_string(),
            avatar: avatar_initials(name),
            join_date: join_date.to_string(),
            is_active,
        },
        password_hash: hash_password(password).expect("argon2 hashing with a fresh salt"),
    }
}

/// Demo rangers available out of the box
fn default_rangers() -> Vec<RangerRecord> {
    vec![
        record(
            "mock-user-1",
            "Sarah Johnson",
            "sarah.johnson@safarimap.com",
            "Senior Ranger",
            "SNP-001",
            "Alpha Team",
            "2021-03-15",
            true,
            "password123",
        ),
        record(
            "mock-user-2",
            "David Okello",
            "david.okello@safarimap.com",
            DEFAULT_ROLE,
            "SNP-002",
            "Bravo Team",
            "2022-07-01",
            true,
            "karibu2024",
        ),
        // Deactivated account, kept on file rather than deleted
        record(
            "mock-user-3",
            "Joseph Mwangi",
            "joseph.mwangi@safarimap.com",
            DEFAULT_ROLE,
            "SNP-003",
            "Alpha Team",
            "2019-11-20",
            false,
            "simba2019",
        ),
    ]
}

#[derive(Debug)]
pub struct MockAuthService {
    registry: RwLock<Vec<RangerRecord>>,
    session: SessionStore,
}

impl MockAuthService {
    /// Create a service seeded with the demo rangers
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(default_rangers()),
            session: SessionStore::new(),
        }
    }

    /// Restore the seeded registry and clear the session
    pub fn reset(&self) {
        *self.registry.write() = default_rangers();
        self.session.clear();
    }
}

impl Default for MockAuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MockAuthService {
    async fn login(&self, credentials: &LoginCredentials) -> AuthResult<AuthSession> {
        let record = {
            let registry = self.registry.read();
            registry
                .iter()
                .find(|r| r.user.email == credentials.email)
                .cloned()
        };
        let record = record.ok_or(AuthError::UserNotFound)?;

        if !verify_password(&credentials.password, &record.password_hash) {
            return Err(AuthError::InvalidPassword);
        }
        if !record.user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        let token = generate_token();
        tracing::info!(
            email = %record.user.email,
            token_fp = %token_fingerprint(&token),
            "ranger logged in"
        );
        Ok(self.session.establish(record.user, token))
    }

    async fn signup(&self, credentials: &SignupCredentials) -> AuthResult<AuthSession> {
        let ranger_id = credentials.ranger_id.trim().to_uppercase();

        {
            let registry = self.registry.read();
            if registry.iter().any(|r| r.user.email == credentials.email) {
                return Err(AuthError::DuplicateEmail);
            }
            if registry.iter().any(|r| r.user.ranger_id == ranger_id) {
                return Err(AuthError::DuplicateRangerId);
            }
        }
        if credentials.password != credentials.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: credentials.email.clone(),
            name: credentials.name.clone(),
            role: DEFAULT_ROLE.to_string(),
            ranger_id,
            team: credentials.team.clone(),
            park: DEFAULT_PARK.to_string(),
            avatar: avatar_initials(&credentials.name),
            join_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            is_active: true,
        };
        let password_hash = match hash_password(&credentials.password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(error = %e, "password hashing failed during signup");
                return Err(AuthError::Transport);
            }
        };

        self.registry.write().push(RangerRecord {
            user: user.clone(),
            password_hash,
        });
        let token = generate_token();
        tracing::info!(email = %user.email, ranger_id = %user.ranger_id, "ranger account created");
        Ok(self.session.establish(user, token))
    }

    async fn logout(&self) -> AuthResult<()> {
        self.session.clear();
        tracing::debug!("session cleared");
        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    async fn auth_token(&self) -> Option<String> {
        self.session.token()
    }

    async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    async fn reset_password(&self, email: &str) -> AuthResult<()> {
        // Same outcome whether or not the address has an account
        tracing::info!(email, "password reset requested");
        Ok(())
    }

    async fn user_profile(&self, user_id: &str) -> AuthResult<Option<User>> {
        let registry = self.registry.read();
        Ok(registry
            .iter()
            .find(|r| r.user.id == user_id)
            .map(|r| r.user.clone()))
    }
}
