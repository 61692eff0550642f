use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::object_storage::ObjectStorage,
};

/// Storage bucket behind the Supabase-compatible object API.
///
/// Writes go to `{base}/storage/v1/object/{bucket}/{path}`; public reads are
/// served from `{base}/storage/v1/object/public/{bucket}/{path}`.
#[derive(Clone)]
pub struct HttpObjectStorage {
    client: Client,
    base_url: String,
    bucket: String,
    service_key: SecretString,
}

impl HttpObjectStorage {
    pub fn new(client: Client, base_url: &str, bucket: String, service_key: SecretString) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            service_key,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> AppResult<()> {
        let response = self
            .client
            .put(self.object_url(path))
            .bearer_auth(self.service_key.expose_secret())
            .header("apikey", self.service_key.expose_secret())
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Storage request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, path, "Storage upload failed");
            return Err(AppError::Upstream(format!("Storage upload failed: {status}")));
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}
