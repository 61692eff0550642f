//! Cross-token issuance for hub users and validation for products.

use super::common::*;
use crate::application::use_cases::cross_token::IssuedCrossToken;
use sincla_types::ValidateCrossTokenResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-cross-token", post(generate_cross_token))
        .route("/validate-cross-token", post(validate_cross_token))
}

#[derive(Debug, Deserialize)]
struct GeneratePayload {
    product_id: Option<String>,
    company_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidatePayload {
    #[serde(default)]
    token: Option<String>,
}

/// POST /generate-cross-token
async fn generate_cross_token(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<GeneratePayload>, JsonRejection>,
) -> AppResult<Json<IssuedCrossToken>> {
    let payload = json_body(payload)?;
    let product_id = required_uuid("product_id", payload.product_id.as_deref())?;
    let company_id = required_uuid("company_id", payload.company_id.as_deref())?;

    let issued = app_state
        .cross_token_use_cases
        .issue(user.user_id, company_id, product_id)
        .await?;
    Ok(Json(issued))
}

fn invalid(
    status: StatusCode,
    error: impl Into<String>,
) -> (StatusCode, Json<ValidateCrossTokenResponse>) {
    (
        status,
        Json(ValidateCrossTokenResponse {
            valid: false,
            payload: None,
            error: Some(error.into()),
        }),
    )
}

/// POST /validate-cross-token
///
/// Absent or unparseable tokens are a client error (400); tokens that parse
/// but fail verification are 401. The body always has the same shape.
async fn validate_cross_token(
    State(app_state): State<AppState>,
    payload: Result<Json<ValidatePayload>, JsonRejection>,
) -> (StatusCode, Json<ValidateCrossTokenResponse>) {
    let token = payload
        .ok()
        .and_then(|Json(p)| p.token)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let Some(token) = token else {
        return invalid(StatusCode::BAD_REQUEST, "Token is required");
    };

    match app_state.cross_token_use_cases.validate(&token) {
        Ok(claims) => (
            StatusCode::OK,
            Json(ValidateCrossTokenResponse {
                valid: true,
                payload: Some(claims),
                error: None,
            }),
        ),
        Err(e) if e.is_malformed() => invalid(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            info!(error = %e, "Cross-token rejected");
            invalid(StatusCode::UNAUTHORIZED, e.to_string())
        }
    }
}
