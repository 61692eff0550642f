use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::pix_transfer::{
        PixTransferGateway, PixTransferReceipt, PixTransferRequest,
    },
};

#[derive(Clone)]
pub struct AsaasClient {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

/// Body of `POST /v3/transfers` for a PIX payout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AsaasTransferBody<'a> {
    value: f64,
    operation_type: &'static str,
    pix_address_key: &'a str,
    pix_address_key_type: &'a str,
    description: &'a str,
    external_reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct AsaasErrorResponse {
    #[serde(default)]
    errors: Vec<AsaasErrorItem>,
}

#[derive(Debug, Deserialize)]
struct AsaasErrorItem {
    #[serde(default)]
    description: Option<String>,
}

impl AsaasClient {
    /// `base_url` may carry a path prefix (the sandbox lives under `/api`).
    pub fn new(client: Client, mut base_url: Url, api_key: SecretString) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Resolves `path` below the base URL, keeping any prefix it has.
    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Internal(format!("Invalid Asaas URL: {e}")))
    }
}

#[async_trait]
impl PixTransferGateway for AsaasClient {
    async fn transfer(&self, request: &PixTransferRequest) -> AppResult<PixTransferReceipt> {
        let body = AsaasTransferBody {
            value: request.amount,
            operation_type: "PIX",
            pix_address_key: &request.pix_key,
            pix_address_key_type: request.pix_key_type.as_ref(),
            description: &request.description,
            external_reference: &request.external_reference,
        };

        let response = self
            .client
            .post(self.endpoint("v3/transfers")?)
            .header("access_token", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Asaas request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read Asaas response: {e}")))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %text, "Asaas API error");
            let detail = serde_json::from_str::<AsaasErrorResponse>(&text)
                .ok()
                .and_then(|e| e.errors.into_iter().find_map(|item| item.description))
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::Upstream(format!("Asaas error: {detail}")));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(body = %text, error = %e, "Failed to parse Asaas response");
            AppError::Upstream(format!("Failed to parse Asaas response: {e}"))
        })
    }
}
