//! Client for the hosted identity service.
//!
//! Covers the password grant, signup, sign-out, recovery email, and token
//! refresh. The project has email confirmation disabled, so signup answers
//! with a usable session directly.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{RemoteError, RemoteResult};

/// An identity-service session: tokens plus the minimal user identity
#[derive(Debug, Clone)]
pub struct RemoteSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Account metadata attached to the signup call. The server-side trigger
/// copies it into the profile row.
#[derive(Debug, Clone, Serialize)]
pub struct SignupMetadata {
    pub name: String,
    pub role: String,
    pub ranger_id: String,
    pub team: String,
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: String,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> RemoteSession {
        // Some responses omit the user's email; fall back to what we sent
        let email = if self.user.email.is_empty() {
            fallback_email.to_string()
        } else {
            self.user.email
        };
        RemoteSession {
            user_id: self.user.id,
            email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
        }
    }
}

#[derive(Debug)]
pub struct IdentityClient {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl IdentityClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Make an authenticated POST request expecting a JSON body back
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> RemoteResult<T> {
        let response = self.send(path, bearer, body).await?;
        let parsed = response
            .json()
            .await
            .context("Failed to parse identity service response")?;
        Ok(parsed)
    }

    /// Make an authenticated POST request, discarding the response body
    async fn post_no_content(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> RemoteResult<()> {
        self.send(path, bearer, body).await.map(|_| ())
    }

    async fn send(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> RemoteResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .context("Failed to reach the identity service")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Exchange email + password for a session
    pub async fn password_login(&self, email: &str, password: &str) -> RemoteResult<RemoteSession> {
        let body = json!({ "email": email, "password": password });
        let response: TokenResponse = self
            .post_json("/auth/v1/token?grant_type=password", None, &body)
            .await?;
        Ok(response.into_session(email))
    }

    /// Create an account, carrying the profile metadata for the signup trigger
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        metadata: &SignupMetadata,
    ) -> RemoteResult<RemoteSession> {
        let body = json!({ "email": email, "password": password, "data": metadata });
        let response: TokenResponse = self.post_json("/auth/v1/signup", None, &body).await?;
        Ok(response.into_session(email))
    }

    /// Revoke the session behind the given access token
    pub async fn logout(&self, access_token: &str) -> RemoteResult<()> {
        self.post_no_content("/auth/v1/logout", Some(access_token), &json!({}))
            .await
    }

    /// Ask the service to send a password-reset email
    pub async fn recover(&self, email: &str) -> RemoteResult<()> {
        self.post_no_content("/auth/v1/recover", None, &json!({ "email": email }))
            .await
    }

    /// Exchange a refresh token for a fresh session
    pub async fn refresh(&self, refresh_token: &str) -> RemoteResult<RemoteSession> {
        let body = json!({ "refresh_token": refresh_token });
        let response: TokenResponse = self
            .post_json("/auth/v1/token?grant_type=refresh_token", None, &body)
            .await?;
        Ok(response.into_session(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parses_and_maps() {
        let body = serde_json::json!({
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "8c2f0a4e-8a3f-4f0e-9f3d-1a2b3c4d5e6f",
                "email": "sarah.johnson@safarimap.com"
            }
        });

        let response: TokenResponse = serde_json::from_value(body).unwrap();
        let session = response.into_session("ignored@safarimap.com");

        assert_eq!(session.user_id, "8c2f0a4e-8a3f-4f0e-9f3d-1a2b3c4d5e6f");
        assert_eq!(session.email, "sarah.johnson@safarimap.com");
        assert_eq!(session.access_token, "at-1");
        assert_eq!(session.refresh_token, "rt-1");
        assert_eq!(session.expires_in, 3600);
    }

    #[test]
    fn test_token_response_email_fallback() {
        let body = serde_json::json!({
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "user": { "id": "u-1" }
        });

        let response: TokenResponse = serde_json::from_value(body).unwrap();
        let session = response.into_session("sent@safarimap.com");
        assert_eq!(session.email, "sent@safarimap.com");
        assert_eq!(session.expires_in, 0);
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = IdentityClient::new("https://project.example.co/", "key");
        assert_eq!(client.base_url, "https://project.example.co");
    }
}
