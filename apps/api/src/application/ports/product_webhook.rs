use async_trait::async_trait;

use crate::app_error::AppResult;

/// Outbound delivery of billing notifications to a product backend.
#[async_trait]
pub trait ProductWebhookSender: Send + Sync {
    /// POSTs `body` to `url`, authenticated with the product's shared `secret`.
    /// Returns the HTTP status of the product's response.
    async fn send(&self, url: &str, secret: &str, body: &str) -> AppResult<u16>;
}
