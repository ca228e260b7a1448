//! Client for the hosted profile store.
//!
//! Profile rows are normally written by a trigger when an account is created;
//! this client reads them back and can create a row directly through an RPC
//! when the trigger has not fired yet.

use anyhow::Context;
use serde::Serialize;

use super::{RemoteError, RemoteResult};
use crate::models::RangerProfile;

/// Row payload for the direct-create RPC
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub ranger_id: String,
    pub team: String,
    pub park: String,
    pub avatar: String,
}

#[derive(Debug)]
pub struct ProfileClient {
    base_url: String,
    anon_key: String,
    table: String,
    client: reqwest::Client,
}

impl ProfileClient {
    pub fn new(base_url: &str, anon_key: &str, table: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            table: table.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Keyed read of one profile row
    pub async fn fetch(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> RemoteResult<Option<RangerProfile>> {
        let url = format!(
            "{}/rest/v1/{}?id=eq.{}&select=*",
            self.base_url, self.table, user_id
        );
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .context("Failed to reach the profile store")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<RangerProfile> = response
            .json()
            .await
            .context("Failed to parse profile rows")?;
        Ok(rows.into_iter().next())
    }

    /// Create the profile row directly, bypassing the signup trigger
    pub async fn create(&self, profile: &NewProfile, access_token: &str) -> RemoteResult<()> {
        let url = format!("{}/rest/v1/rpc/create_ranger_profile", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(profile)
            .send()
            .await
            .context("Failed to reach the profile store")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
