use super::common::*;
use crate::application::use_cases::partner::WithdrawalResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/partner-withdrawal", post(process_withdrawal))
}

#[derive(Debug, Deserialize)]
struct WithdrawalPayload {
    withdrawal_id: Option<String>,
}

/// POST /partner-withdrawal
///
/// Admin only. Pays a pending withdrawal through the PIX gateway when one is
/// configured, or marks it paid for manual settlement otherwise.
async fn process_withdrawal(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<WithdrawalPayload>, JsonRejection>,
) -> AppResult<Json<WithdrawalResult>> {
    let payload = json_body(payload)?;
    let withdrawal_id = required_uuid("withdrawal_id", payload.withdrawal_id.as_deref())?;

    let result = app_state
        .partner_use_cases
        .process_withdrawal(user.user_id, withdrawal_id)
        .await?;
    Ok(Json(result))
}
