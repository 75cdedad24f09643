//! Object storage client
//!
//! Thin HTTP client over the hosted object storage: event posters live at
//! `event-posters/{eventId}/{fileName}`, profile pictures at
//! `profile-pictures/{userId}`. Writes go to the storage endpoint; the URL
//! embedded into records points at the public read endpoint.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::StorageConfig;
use crate::utils::errors::{CampusConnectError, Result};

/// An image payload handed over by the submitting user.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    base_url: Url,
    public_base_url: Url,
}

impl StorageClient {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("CampusConnect/1.0")
            .build()
            .map_err(CampusConnectError::Http)?;

        Ok(Self {
            client,
            base_url: parse_base(&config.base_url)?,
            public_base_url: parse_base(&config.public_base_url)?,
        })
    }

    /// Upload an event poster, keyed by the generated event id. Returns the
    /// durable public URL to embed in the event record.
    pub async fn upload_event_poster(
        &self,
        event_id: &str,
        upload: &ImageUpload,
    ) -> Result<String> {
        let object_path = format!(
            "event-posters/{}/{}",
            event_id,
            urlencoding::encode(&upload.file_name)
        );
        self.put_object(&object_path, upload).await
    }

    /// Upload a profile picture, keyed by the owning user id.
    pub async fn upload_profile_picture(
        &self,
        user_id: &str,
        upload: &ImageUpload,
    ) -> Result<String> {
        let object_path = format!("profile-pictures/{user_id}");
        self.put_object(&object_path, upload).await
    }

    async fn put_object(&self, object_path: &str, upload: &ImageUpload) -> Result<String> {
        let target = self.base_url.join(object_path)?;
        debug!(object_path = %object_path, size = upload.bytes.len(), "Uploading object");

        let response = self
            .client
            .put(target)
            .header(reqwest::header::CONTENT_TYPE, &upload.content_type)
            .body(upload.bytes.clone())
            .send()
            .await
            .map_err(|e| CampusConnectError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            warn!(object_path = %object_path, status = %response.status(), "Object upload rejected");
            return Err(CampusConnectError::UploadFailed(format!(
                "storage returned {}",
                response.status()
            )));
        }

        Ok(self.public_base_url.join(object_path)?.to_string())
    }
}

/// Base URLs must end with '/' for `Url::join` to append instead of
/// replace the final path segment.
fn parse_base(raw: &str) -> Result<Url> {
    let mut normalized = raw.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(Url::parse(&normalized)?)
}
