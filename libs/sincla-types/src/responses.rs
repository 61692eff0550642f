use serde::{Deserialize, Serialize};

use crate::{AccessLevel, CrossTokenClaims, GrantedBy};

/// Result of a permission check for (user, company, product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub has_access: bool,
    pub access_level: Option<AccessLevel>,
    pub granted_by: Option<GrantedBy>,
    pub company_role: Option<String>,
    pub subscription_active: bool,
}

impl PermissionResponse {
    /// The company has no active or trialing subscription to the product.
    pub fn no_subscription() -> Self {
        Self {
            has_access: false,
            access_level: None,
            granted_by: None,
            company_role: None,
            subscription_active: false,
        }
    }

    /// The subscription is live but the user has no active membership.
    pub fn no_membership() -> Self {
        Self {
            subscription_active: true,
            ..Self::no_subscription()
        }
    }

    pub fn granted(access_level: AccessLevel, granted_by: GrantedBy, company_role: &str) -> Self {
        Self {
            has_access: true,
            access_level: Some(access_level),
            granted_by: Some(granted_by),
            company_role: Some(company_role.to_string()),
            subscription_active: true,
        }
    }
}

/// Snapshot of a subscription as exposed to products.
///
/// Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub id: String,
    pub status: String,
    pub plan_id: Option<String>,
    pub plan: Option<String>,
    pub billing_cycle: Option<String>,
    pub gateway: Option<String>,
    pub monthly_amount: Option<f64>,
    pub current_period_start: Option<String>,
    pub current_period_end: Option<String>,
    pub canceled_at: Option<String>,
}

/// Response of the hub's subscription check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCheck {
    pub has_subscription: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_days: Option<i32>,
}

/// Response of the hub's cross-token validation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateCrossTokenResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<CrossTokenClaims>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
