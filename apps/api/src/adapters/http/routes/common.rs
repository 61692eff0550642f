//! Shared imports and helpers for route modules.

pub use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header::CACHE_CONTROL},
    response::IntoResponse,
    routing::{get, post},
};
pub use serde::{Deserialize, Serialize};
pub use tracing::{info, warn};
pub use uuid::Uuid;

pub use crate::adapters::http::{app_state::AppState, auth::AuthUser};
pub use crate::app_error::{AppError, AppResult};

pub const CACHE_PUBLIC_60: &str = "public, max-age=60";
pub const CACHE_PUBLIC_300: &str = "public, max-age=300";
pub const CACHE_NO_STORE: &str = "no-store";

/// Unwraps a JSON body, turning axum's rejection into our 400 shape.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// Parses a required UUID field from a request body.
pub(crate) fn required_uuid(field: &str, value: Option<&str>) -> AppResult<Uuid> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{field} is required")))?;
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("{field} must be a UUID")))
}

/// JSON response with a `Cache-Control` header.
pub(crate) fn cached_json<T: Serialize>(cache_control: &'static str, body: T) -> impl IntoResponse {
    (
        [(CACHE_CONTROL, HeaderValue::from_static(cache_control))],
        Json(body),
    )
}

/// Body or query carrying a company id.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyRef {
    #[serde(default)]
    pub company_id: Option<String>,
}
