//! Clients for the hosted backend's REST surfaces.
//!
//! Each client owns a `reqwest::Client` plus the project credentials and
//! exposes typed operations. [`RemoteError`] separates requests the service
//! rejected from transport-level failures so callers can map the two
//! differently: a rejection carries the status and body, a transport failure
//! means the request never completed or the response was malformed.

mod identity;
mod profiles;
mod storage;

pub use identity::{IdentityClient, RemoteSession, SignupMetadata};
pub use profiles::{NewProfile, ProfileClient};
pub use storage::StorageClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status
    #[error("remote service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never completed, or the response body was malformed
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl RemoteError {
    /// HTTP status of a rejection, if this was one
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Rejected { status, .. } => Some(*status),
            RemoteError::Transport(_) => None,
        }
    }
}

pub(crate) type RemoteResult<T> = Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_carries_status() {
        let err = RemoteError::Rejected {
            status: 422,
            message: "User already registered".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("422"));

        let err = RemoteError::Transport(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), None);
    }
}
