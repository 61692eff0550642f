//! Sincla client implementation.

use sincla_types::{CrossTokenClaims, verify_cross_token};
use uuid::Uuid;

use crate::error::SinclaError;
use crate::extract::{Headers, extract_from_cookie, extract_from_header};

#[cfg(feature = "client")]
use sincla_types::{ErrorCode, PermissionResponse, SubscriptionCheck, ValidateCrossTokenResponse};

/// Configuration for the Sincla client.
#[derive(Debug, Clone)]
pub struct SinclaConfig {
    /// This product's ID in the hub (UUID)
    pub product_id: String,

    /// Cross-token secret shared with the hub
    pub shared_secret: String,

    /// Base URL of the hub API; required only for remote calls
    pub hub_url: Option<String>,

    /// Clock skew tolerance in seconds (default: 60)
    pub clock_skew_seconds: Option<u64>,
}

/// Sincla client for satellite products.
///
/// Verifies cross-tokens locally and, with the `client` feature, queries the hub.
pub struct SinclaClient {
    config: SinclaConfig,
    #[cfg(feature = "client")]
    http_client: reqwest::Client,
}

impl SinclaClient {
    /// Create a new Sincla client.
    ///
    /// # Returns
    /// A configured `SinclaClient` or an error if configuration is invalid.
    pub fn new(config: SinclaConfig) -> Result<Self, SinclaError> {
        if config.shared_secret.is_empty() {
            return Err(SinclaError::Config(
                "shared_secret is required. Ask the hub operator for CROSS_TOKEN_SECRET.".into(),
            ));
        }

        if Uuid::parse_str(&config.product_id).is_err() {
            return Err(SinclaError::Config("product_id must be a UUID".into()));
        }

        Ok(Self {
            config,
            #[cfg(feature = "client")]
            http_client: reqwest::Client::new(),
        })
    }

    /// Verify a cross-token locally.
    ///
    /// No network call required. Fails when the token was issued for another product.
    ///
    /// # Example
    /// ```rust,ignore
    /// let claims = client.verify_token("eyJ...")?;
    /// println!("Access level: {}", claims.access_level);
    /// ```
    pub fn verify_token(&self, token: &str) -> Result<CrossTokenClaims, SinclaError> {
        let clock_skew = self.config.clock_skew_seconds.unwrap_or(60);
        let claims = verify_cross_token(token, &self.config.shared_secret, clock_skew)?;

        if !claims.product_id.eq_ignore_ascii_case(&self.config.product_id) {
            return Err(SinclaError::ProductMismatch {
                expected: self.config.product_id.clone(),
                actual: claims.product_id,
            });
        }

        Ok(claims)
    }

    /// Extract a token from request headers.
    ///
    /// Tries Authorization: Bearer header first, then falls back to the cross-token cookie.
    pub fn extract_token<H: Headers>(&self, headers: &H) -> Option<String> {
        if let Some(token) = headers.get_authorization().and_then(extract_from_header) {
            return Some(token.to_string());
        }

        headers
            .get_cookie()
            .and_then(extract_from_cookie)
            .map(str::to_string)
    }

    /// Authenticate a request by extracting and verifying the token.
    pub fn authenticate<H: Headers>(&self, headers: &H) -> Result<CrossTokenClaims, SinclaError> {
        let token = self
            .extract_token(headers)
            .ok_or_else(|| SinclaError::InvalidToken("No token found".into()))?;

        self.verify_token(&token)
    }

    /// Ask the hub to validate a token.
    ///
    /// Useful for products that do not hold the shared secret.
    #[cfg(feature = "client")]
    pub async fn validate_remote(
        &self,
        token: &str,
    ) -> Result<ValidateCrossTokenResponse, SinclaError> {
        let response = self
            .http_client
            .post(self.hub_endpoint("validate-cross-token")?)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;

        // 400/401 still carry a `{valid:false, error}` body
        match response.status() {
            s if s.is_success()
                || s == reqwest::StatusCode::BAD_REQUEST
                || s == reqwest::StatusCode::UNAUTHORIZED =>
            {
                Ok(response.json().await?)
            }
            _ => Err(api_error(response).await),
        }
    }

    /// Fetch the permission of a user on this product for a company.
    #[cfg(feature = "client")]
    pub async fn check_permission(
        &self,
        user_id: &str,
        company_id: &str,
    ) -> Result<PermissionResponse, SinclaError> {
        let response = self
            .http_client
            .post(self.hub_endpoint("check-permission")?)
            .json(&serde_json::json!({
                "user_id": user_id,
                "company_id": company_id,
                "product_id": self.config.product_id,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the subscription state of a company for this product.
    #[cfg(feature = "client")]
    pub async fn check_subscription(
        &self,
        company_id: &str,
    ) -> Result<SubscriptionCheck, SinclaError> {
        let response = self
            .http_client
            .post(self.hub_endpoint("check-subscription")?)
            .json(&serde_json::json!({
                "company_id": company_id,
                "product_id": self.config.product_id,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }

    #[cfg(feature = "client")]
    fn hub_endpoint(&self, path: &str) -> Result<String, SinclaError> {
        let base = self
            .config
            .hub_url
            .as_deref()
            .ok_or_else(|| SinclaError::Config("hub_url is required for hub API calls".into()))?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), path))
    }
}

#[cfg(feature = "client")]
async fn api_error(response: reqwest::Response) -> SinclaError {
    #[derive(serde::Deserialize)]
    struct ApiErrorBody {
        code: Option<ErrorCode>,
        error: Option<String>,
    }

    let status = response.status();
    let body = response.json::<ApiErrorBody>().await.ok();

    SinclaError::ApiError {
        code: body
            .as_ref()
            .and_then(|b| b.code)
            .unwrap_or(ErrorCode::InternalError),
        message: body
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Hub request failed: {}", status)),
    }
}
