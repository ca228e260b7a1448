//! Session state and credential primitives shared by the auth backends.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use parking_lot::Mutex;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::models::{AuthSession, User};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random opaque session token
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Short token fingerprint, safe for log lines
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

/// Holds at most one authenticated `{user, token}` pair.
///
/// Login and signup replace any existing session (last-write-wins); logout
/// clears it. A session exists iff both the user and the token are set, which
/// the [`AuthSession`] type guarantees by construction.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Mutex<Option<AuthSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session
    pub fn establish(&self, user: User, token: String) -> AuthSession {
        let session = AuthSession { user, token };
        *self.current.lock() = Some(session.clone());
        session
    }

    /// Clear the current session. Safe to call repeatedly.
    pub fn clear(&self) {
        *self.current.lock() = None;
    }

    pub fn user(&self) -> Option<User> {
        self.current.lock().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.current.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.lock().is_some()
    }
}
