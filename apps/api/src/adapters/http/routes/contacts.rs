use super::common::*;
use crate::application::use_cases::contacts::{ContactInput, SyncReport};

pub fn router() -> Router<AppState> {
    Router::new().route("/sync-contacts", post(sync_contacts))
}

#[derive(Debug, Deserialize)]
struct SyncContactsPayload {
    company_id: Option<String>,
    #[serde(default)]
    contacts: Vec<ContactInput>,
}

/// POST /sync-contacts
async fn sync_contacts(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<SyncContactsPayload>, JsonRejection>,
) -> AppResult<Json<SyncReport>> {
    let payload = json_body(payload)?;
    let company_id = required_uuid("company_id", payload.company_id.as_deref())?;

    let report = app_state
        .contact_use_cases
        .sync(user.user_id, company_id, payload.contacts)
        .await?;
    Ok(Json(report))
}
