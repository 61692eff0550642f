use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::entities::{gateway::Gateway, subscription::BillingCycle};

/// Canonical billing event kinds shared by every gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingEventKind {
    #[serde(rename = "subscription.created")]
    SubscriptionCreated,
    #[serde(rename = "subscription.updated")]
    SubscriptionUpdated,
    #[serde(rename = "subscription.canceled")]
    SubscriptionCanceled,
    #[serde(rename = "subscription.renewed")]
    SubscriptionRenewed,
    #[serde(rename = "payment.succeeded")]
    PaymentSucceeded,
    #[serde(rename = "payment.failed")]
    PaymentFailed,
    #[serde(rename = "unmapped", other)]
    Unmapped,
}

impl BillingEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingEventKind::SubscriptionCreated => "subscription.created",
            BillingEventKind::SubscriptionUpdated => "subscription.updated",
            BillingEventKind::SubscriptionCanceled => "subscription.canceled",
            BillingEventKind::SubscriptionRenewed => "subscription.renewed",
            BillingEventKind::PaymentSucceeded => "payment.succeeded",
            BillingEventKind::PaymentFailed => "payment.failed",
            BillingEventKind::Unmapped => "unmapped",
        }
    }
}

/// Payload of a canonical billing event.
///
/// Identifiers are kept exactly as the gateway sent them; they are resolved
/// against the store when the event is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingEventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Plan UUID, or a raw plan code when the gateway only knows the code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub metadata: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedBillingEvent {
    #[serde(rename = "type")]
    pub kind: BillingEventKind,
    pub gateway: Gateway,
    pub data: BillingEventData,
}
