//! Normalization of gateway webhook payloads into canonical billing events.
//!
//! Each gateway gets its own decoder; all of them produce a
//! `NormalizedBillingEvent`. `Ok(None)` means the event is recognized but
//! carries no state transition and must not reach the processor.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        billing_event::{BillingEventData, BillingEventKind, NormalizedBillingEvent},
        gateway::Gateway,
        subscription::BillingCycle,
    },
};

/// Raw webhook body tagged with the gateway that sent it.
#[derive(Debug, Clone)]
pub enum GatewayPayload {
    Stripe(JsonValue),
    Asaas(JsonValue),
    Manual(JsonValue),
}

impl GatewayPayload {
    pub fn from_gateway(gateway: Gateway, raw: JsonValue) -> Self {
        match gateway {
            Gateway::Stripe => GatewayPayload::Stripe(raw),
            Gateway::Asaas => GatewayPayload::Asaas(raw),
            Gateway::Manual => GatewayPayload::Manual(raw),
        }
    }
}

pub fn normalize(payload: GatewayPayload) -> AppResult<Option<NormalizedBillingEvent>> {
    match payload {
        GatewayPayload::Stripe(raw) => normalize_canonical(raw, Some(Gateway::Stripe)).map(Some),
        GatewayPayload::Manual(raw) => normalize_canonical(raw, None).map(Some),
        GatewayPayload::Asaas(raw) => normalize_asaas(raw),
    }
}

// ============================================================================
// Canonical payloads (Stripe bridge and manual/internal callers)
// ============================================================================

#[derive(Deserialize)]
struct CanonicalPayload {
    #[serde(rename = "type")]
    kind: BillingEventKind,
    #[serde(default)]
    gateway: Option<Gateway>,
    #[serde(default)]
    data: BillingEventData,
}

fn normalize_canonical(
    raw: JsonValue,
    forced_gateway: Option<Gateway>,
) -> AppResult<NormalizedBillingEvent> {
    let payload: CanonicalPayload = serde_json::from_value(raw)
        .map_err(|e| AppError::InvalidInput(format!("Invalid billing event: {e}")))?;

    Ok(NormalizedBillingEvent {
        kind: payload.kind,
        gateway: forced_gateway
            .or(payload.gateway)
            .unwrap_or(Gateway::Manual),
        data: payload.data,
    })
}

// ============================================================================
// Asaas
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsaasWebhook {
    event: String,
    #[serde(default)]
    payment: Option<AsaasPayment>,
    #[serde(default)]
    subscription: Option<AsaasSubscription>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsaasPayment {
    id: Option<String>,
    subscription: Option<String>,
    value: Option<f64>,
    external_reference: Option<String>,
    billing_type: Option<String>,
    due_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsaasSubscription {
    id: Option<String>,
    value: Option<f64>,
    cycle: Option<String>,
    status: Option<String>,
    next_due_date: Option<String>,
    external_reference: Option<String>,
}

/// Asaas event name to canonical kind. `None` marks events that are ignored.
pub fn map_asaas_event(event: &str) -> Option<BillingEventKind> {
    match event {
        "PAYMENT_CONFIRMED" | "PAYMENT_RECEIVED" => Some(BillingEventKind::PaymentSucceeded),
        "PAYMENT_OVERDUE"
        | "PAYMENT_REPROVED_BY_RISK_ANALYSIS"
        | "PAYMENT_CREDIT_CARD_CAPTURE_REFUSED" => Some(BillingEventKind::PaymentFailed),
        "SUBSCRIPTION_CREATED" => Some(BillingEventKind::SubscriptionCreated),
        "SUBSCRIPTION_UPDATED" => Some(BillingEventKind::SubscriptionUpdated),
        "SUBSCRIPTION_DELETED" | "SUBSCRIPTION_INACTIVATED" => {
            Some(BillingEventKind::SubscriptionCanceled)
        }
        "SUBSCRIPTION_RENEWED" => Some(BillingEventKind::SubscriptionRenewed),
        // PAYMENT_CREATED, PAYMENT_UPDATED, PAYMENT_DELETED, PAYMENT_BANK_SLIP_VIEWED, ...
        _ => None,
    }
}

pub fn map_asaas_cycle(cycle: &str) -> BillingCycle {
    match cycle {
        "YEARLY" => BillingCycle::Yearly,
        _ => BillingCycle::Monthly,
    }
}

pub fn map_asaas_status(status: &str) -> String {
    match status {
        "ACTIVE" => "active".to_string(),
        "INACTIVE" => "canceled".to_string(),
        "EXPIRED" => "expired".to_string(),
        other => other.to_lowercase(),
    }
}

/// Splits `"<company_id>[:<product_id>]"`.
pub fn split_external_reference(reference: &str) -> (Option<String>, Option<String>) {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    match reference.split_once(':') {
        Some((company, product)) => (non_empty(company), non_empty(product)),
        None => (non_empty(reference), None),
    }
}

/// Parses RFC 3339 timestamps and the plain dates Asaas uses for due dates.
pub fn parse_gateway_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn normalize_asaas(raw: JsonValue) -> AppResult<Option<NormalizedBillingEvent>> {
    let webhook: AsaasWebhook = serde_json::from_value(raw)
        .map_err(|e| AppError::InvalidInput(format!("Invalid Asaas webhook: {e}")))?;

    let Some(kind) = map_asaas_event(&webhook.event) else {
        return Ok(None);
    };

    let mut data = BillingEventData::default();

    if webhook.event.starts_with("PAYMENT_") {
        if let Some(payment) = &webhook.payment {
            let (company_id, product_id) = payment
                .external_reference
                .as_deref()
                .map(split_external_reference)
                .unwrap_or_default();
            data.subscription_id = payment.subscription.clone();
            data.company_id = company_id;
            data.product_id = product_id;
            data.amount = payment.value;
            data.metadata = json!({
                "asaas_event": webhook.event,
                "payment_id": payment.id,
                "billing_type": payment.billing_type,
                "due_date": payment.due_date,
            });
        }
    } else if let Some(subscription) = &webhook.subscription {
        let (company_id, product_id) = subscription
            .external_reference
            .as_deref()
            .map(split_external_reference)
            .unwrap_or_default();
        data.subscription_id = subscription.id.clone();
        data.company_id = company_id;
        data.product_id = product_id;
        data.amount = subscription.value;
        data.billing_cycle = subscription.cycle.as_deref().map(map_asaas_cycle);
        data.status = subscription.status.as_deref().map(map_asaas_status);
        data.current_period_end = subscription
            .next_due_date
            .as_deref()
            .and_then(parse_gateway_date);
        data.metadata = json!({ "asaas_event": webhook.event });
    }

    if data.metadata.is_null() {
        data.metadata = json!({ "asaas_event": webhook.event });
    }

    Ok(Some(NormalizedBillingEvent {
        kind,
        gateway: Gateway::Asaas,
        data,
    }))
}
