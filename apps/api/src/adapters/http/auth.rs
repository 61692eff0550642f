use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use uuid::Uuid;

use crate::{adapters::http::app_state::AppState, app_error::AppError, application::jwt};

/// Hub user authenticated by a session bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    tracing::debug!("Missing or malformed bearer token");
                    AppError::InvalidCredentials
                })?;

        let claims = jwt::verify_hub_token(bearer.token(), &state.config.hub_jwt_secret)?;
        let user = AuthUser {
            user_id: claims.user_id()?,
            email: claims.email,
        };

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
