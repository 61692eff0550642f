use async_trait::async_trait;

use crate::app_error::AppResult;

/// Blob store holding public assets (logos, favicons).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `path`, replacing any existing object.
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> AppResult<()>;

    /// Public URL an object at `path` is served from.
    fn public_url(&self, path: &str) -> String;
}
