//! Core services for SafariMap, a field-reporting app for park rangers.
//!
//! The crate covers credential validation, the session lifecycle, a
//! backend-agnostic authentication service with mock and hosted
//! implementations, auth-state propagation, and incident/point-of-interest
//! submission. UI concerns live in the mobile client; everything here is
//! in-process logic plus HTTP calls to the hosted backend.

pub mod auth;
pub mod config;
pub mod models;
pub mod remote;
pub mod reports;
pub mod validation;

pub use auth::{
    select_backend, AuthBackend, AuthError, AuthEvent, AuthResult, AuthSubscription,
    HostedAuthService, MockAuthService, SessionSnapshot, SessionStore,
};
pub use config::Config;
pub use models::{AuthSession, LoginCredentials, SignupCredentials, User};
