//! Client for the hosted object storage, used for report photos.

use anyhow::Context;

use super::{RemoteError, RemoteResult};

pub struct StorageClient {
    base_url: String,
    anon_key: String,
    bucket: String,
    client: reqwest::Client,
}

impl StorageClient {
    pub fn new(base_url: &str, anon_key: &str, bucket: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bucket: bucket.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Object path for a new photo: one directory per reporter, unique file name
    pub fn photo_path(user_id: &str, extension: &str) -> String {
        format!("{}/{}.{}", user_id, uuid::Uuid::new_v4(), extension)
    }

    /// Upload a photo; returns the public URL of the stored object
    pub async fn upload_photo(
        &self,
        access_token: &str,
        object_path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> RemoteResult<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_path
        );
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .context("Failed to reach the storage service")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_paths_are_unique_per_upload() {
        let a = StorageClient::photo_path("user-1", "jpg");
        let b = StorageClient::photo_path("user-1", "jpg");

        assert!(a.starts_with("user-1/"));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
    }
}
