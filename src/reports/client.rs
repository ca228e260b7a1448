//! Submission client for incidents and points of interest.
//!
//! Photos are uploaded to object storage first; the report row then carries
//! their public URLs. Submission requires an authenticated session's access
//! token.

use anyhow::Context;
use serde_json::json;
use thiserror::Error;

use super::{format_coordinates, validate_incident, validate_location, IncidentDraft, LocationDraft};
use crate::remote::{RemoteError, StorageClient};

/// A photo attachment captured in the field
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// The draft failed local validation; nothing was sent
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub struct ReportsClient {
    base_url: String,
    anon_key: String,
    storage: StorageClient,
    client: reqwest::Client,
}

impl ReportsClient {
    pub fn new(base_url: &str, anon_key: &str, storage_bucket: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            storage: StorageClient::new(&base_url, anon_key, storage_bucket),
            anon_key: anon_key.to_string(),
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Upload the attached photos, then insert the incident row. Returns the
    /// stored photo URLs.
    pub async fn submit_incident(
        &self,
        access_token: &str,
        reported_by: &str,
        draft: &IncidentDraft,
        photos: Vec<Photo>,
    ) -> Result<Vec<String>, ReportError> {
        validate_incident(draft).map_err(ReportError::Invalid)?;

        let mut photo_urls = Vec::with_capacity(photos.len());
        for photo in photos {
            let path = StorageClient::photo_path(reported_by, &photo.extension);
            let url = self
                .storage
                .upload_photo(access_token, &path, photo.bytes, &photo.content_type)
                .await?;
            photo_urls.push(url);
        }

        let row = json!({
            "title": draft.title.trim(),
            "description": draft.description,
            "severity": draft.severity,
            "latitude": draft.latitude,
            "longitude": draft.longitude,
            "coordinates": format_coordinates(draft.latitude, draft.longitude),
            "photo_urls": photo_urls,
            "reported_by": reported_by,
            "reported_at": chrono::Utc::now().to_rfc3339(),
        });
        self.insert("incidents", &row, access_token).await?;

        tracing::info!(reported_by, photos = photo_urls.len(), "incident submitted");
        Ok(photo_urls)
    }

    /// Insert a point-of-interest row
    pub async fn submit_location(
        &self,
        access_token: &str,
        submitted_by: &str,
        draft: &LocationDraft,
    ) -> Result<(), ReportError> {
        validate_location(draft).map_err(ReportError::Invalid)?;

        let row = json!({
            "name": draft.name.trim(),
            "category": draft.category,
            "latitude": draft.latitude,
            "longitude": draft.longitude,
            "coordinates": format_coordinates(draft.latitude, draft.longitude),
            "notes": draft.notes,
            "submitted_by": submitted_by,
            "submitted_at": chrono::Utc::now().to_rfc3339(),
        });
        self.insert("locations", &row, access_token).await?;

        tracing::info!(submitted_by, "point of interest submitted");
        Ok(())
    }

    async fn insert(
        &self,
        table: &str,
        row: &serde_json::Value,
        access_token: &str,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .context("Failed to reach the report store")?;

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
