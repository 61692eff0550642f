//! Entitlement checks products call before serving a request.

use super::common::*;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check-permission", post(check_permission))
        .route("/check-subscription", post(check_subscription))
}

#[derive(Debug, Deserialize)]
struct CheckPermissionPayload {
    user_id: Option<String>,
    company_id: Option<String>,
    product_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckSubscriptionPayload {
    company_id: Option<String>,
    product_id: Option<String>,
}

/// POST /check-permission
///
/// Owner and partner grants do not depend on per-member rows, so they may
/// be cached briefly. Everything else must be re-checked on every call.
async fn check_permission(
    State(app_state): State<AppState>,
    payload: Result<Json<CheckPermissionPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let payload = json_body(payload)?;
    let user_id = required_uuid("user_id", payload.user_id.as_deref())?;
    let company_id = required_uuid("company_id", payload.company_id.as_deref())?;
    let product_id = required_uuid("product_id", payload.product_id.as_deref())?;

    let permission = app_state
        .permission_use_cases
        .resolve(user_id, company_id, product_id)
        .await?;

    let cache_control = if permission.granted_by.is_some_and(|g| g.is_stable()) {
        CACHE_PUBLIC_60
    } else {
        CACHE_NO_STORE
    };
    Ok(cached_json(cache_control, permission))
}

/// POST /check-subscription
async fn check_subscription(
    State(app_state): State<AppState>,
    payload: Result<Json<CheckSubscriptionPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let payload = json_body(payload)?;
    let company_id = required_uuid("company_id", payload.company_id.as_deref())?;
    let product_id = required_uuid("product_id", payload.product_id.as_deref())?;

    let check = app_state
        .billing_use_cases
        .check_subscription(company_id, product_id)
        .await?;
    Ok(cached_json(CACHE_PUBLIC_60, check))
}
