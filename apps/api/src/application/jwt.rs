use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sincla_types::{CrossTokenClaims, JwtError, sign_cross_token};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

/// Audience the hub's auth provider stamps on user session tokens.
pub const HUB_TOKEN_AUDIENCE: &str = "authenticated";

// ============================================================================
// Hub Session Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HubClaims {
    pub sub: String, // auth user id
    #[serde(default)]
    pub email: Option<String>,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl HubClaims {
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidCredentials)
    }
}

pub fn verify_hub_token(token: &str, secret: &SecretString) -> AppResult<HubClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[HUB_TOKEN_AUDIENCE]);
    decode::<HubClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected hub bearer token");
        AppError::InvalidCredentials
    })
}

// ============================================================================
// Cross-Token Claims
// ============================================================================

pub fn issue_cross_token(claims: &CrossTokenClaims, secret: &SecretString) -> AppResult<String> {
    sign_cross_token(claims, secret.expose_secret()).map_err(|e| AppError::Internal(e.to_string()))
}

/// Verifies a cross-token with no clock-skew leeway.
pub fn verify_cross_token(
    token: &str,
    secret: &SecretString,
) -> Result<CrossTokenClaims, JwtError> {
    sincla_types::verify_cross_token(token, secret.expose_secret(), 0)
}
