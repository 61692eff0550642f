use async_trait::async_trait;
use reqwest::Client;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::product_webhook::ProductWebhookSender,
    infra::webhook_signature::sign_payload,
};

pub const HUB_SECRET_HEADER: &str = "X-Hub-Secret";
pub const HUB_SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Delivers billing notifications over HTTP. No retries.
#[derive(Clone)]
pub struct HttpProductWebhookSender {
    client: Client,
}

impl HttpProductWebhookSender {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductWebhookSender for HttpProductWebhookSender {
    async fn send(&self, url: &str, secret: &str, body: &str) -> AppResult<u16> {
        let mut request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if !secret.is_empty() {
            let timestamp = chrono::Utc::now().timestamp();
            request = request
                .header(HUB_SECRET_HEADER, secret)
                .header(HUB_SIGNATURE_HEADER, sign_payload(secret, timestamp, body));
        }

        let response = request
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Product webhook request failed: {e}")))?;

        Ok(response.status().as_u16())
    }
}
