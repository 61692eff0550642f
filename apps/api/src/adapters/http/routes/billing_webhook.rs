//! Inbound billing webhook shared by Stripe, Asaas and internal callers.

use super::common::*;
use crate::application::gateway_events::{GatewayPayload, normalize};
use crate::application::use_cases::billing::ProcessOutcome;
use crate::infra::webhook_signature::{ASAAS_TOKEN_HEADER, STRIPE_SIGNATURE_HEADER};
use chrono::Utc;
use serde_json::Value as JsonValue;

pub fn router() -> Router<AppState> {
    Router::new().route("/billing-webhook", post(handle_billing_webhook))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /billing-webhook
///
/// Business failures are answered with 200 and `success: false` so gateways
/// do not retry them; only authentication and malformed bodies are errors.
async fn handle_billing_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<ProcessOutcome>> {
    let gateway = app_state
        .signature_verifier
        .verify(
            &body,
            header_str(&headers, STRIPE_SIGNATURE_HEADER),
            header_str(&headers, ASAAS_TOKEN_HEADER),
            Utc::now().timestamp(),
        )
        .map_err(|rejection| {
            warn!(reason = %rejection, "Billing webhook rejected");
            AppError::InvalidCredentials
        })?;

    let raw: JsonValue = serde_json::from_str(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid webhook payload: {e}")))?;

    let Some(event) = normalize(GatewayPayload::from_gateway(gateway, raw))? else {
        info!(%gateway, "Billing event ignored");
        return Ok(Json(ProcessOutcome {
            success: true,
            message: "ignored".to_string(),
            target: None,
        }));
    };

    let outcome = app_state.billing_use_cases.process(&event).await;
    info!(
        %gateway,
        event_type = event.kind.as_str(),
        success = outcome.success,
        message = %outcome.message,
        "Billing event processed"
    );

    if outcome.success {
        if let Some(target) = outcome.target {
            app_state.notifier.clone().spawn_notify(event, target);
        }
    }

    Ok(Json(outcome))
}
