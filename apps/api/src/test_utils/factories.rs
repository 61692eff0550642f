//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    application::use_cases::{
        billing::{ProductPlanProfile, ProductProfile, SubscriptionProfile},
        company::{CompanyBranding, CompanyContact, CompanyProfile},
        cross_token::UserProfile,
        partner::{PartnerProfile, WithdrawalProfile},
        permission::MembershipProfile,
    },
    domain::entities::{
        gateway::Gateway,
        membership::MembershipStatus,
        partner::{PartnerStatus, PixKeyType, WithdrawalStatus},
        subscription::{BillingCycle, SubscriptionStatus},
    },
};

/// Fixed timestamp so fixtures compare equal across runs.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Create a test product with sensible defaults. No webhook, no trial.
pub fn create_test_product(overrides: impl FnOnce(&mut ProductProfile)) -> ProductProfile {
    let mut product = ProductProfile {
        id: Uuid::new_v4(),
        slug: "sincla-rh".to_string(),
        name: "Sincla RH".to_string(),
        webhook_url: None,
        webhook_secret: None,
        trial_days: 0,
    };
    overrides(&mut product);
    product
}

/// Create a test plan belonging to `product_id`.
pub fn create_test_plan(
    product_id: Uuid,
    overrides: impl FnOnce(&mut ProductPlanProfile),
) -> ProductPlanProfile {
    let mut plan = ProductPlanProfile {
        id: Uuid::new_v4(),
        product_id,
        slug: "pro".to_string(),
        name: "Pro".to_string(),
    };
    overrides(&mut plan);
    plan
}

/// Create an active monthly subscription with no plan reference.
pub fn create_test_subscription(
    company_id: Uuid,
    product_id: Uuid,
    overrides: impl FnOnce(&mut SubscriptionProfile),
) -> SubscriptionProfile {
    let mut subscription = SubscriptionProfile {
        id: Uuid::new_v4(),
        company_id,
        product_id,
        plan_id: None,
        plan: None,
        status: SubscriptionStatus::Active,
        billing_cycle: Some(BillingCycle::Monthly),
        current_period_start: Some(test_datetime()),
        current_period_end: None,
        canceled_at: None,
        gateway: Some(Gateway::Asaas),
        gateway_subscription_id: None,
        monthly_amount: Some(99.9),
        version: 1,
        created_at: Some(test_datetime()),
        updated_at: Some(test_datetime()),
    };
    overrides(&mut subscription);
    subscription
}

/// Create a company owned by `subscriber_id`, with no branding set.
pub fn create_test_company(
    subscriber_id: Uuid,
    overrides: impl FnOnce(&mut CompanyProfile),
) -> CompanyProfile {
    let mut company = CompanyProfile {
        id: Uuid::new_v4(),
        slug: "acme".to_string(),
        name: "Acme Ltda".to_string(),
        cnpj: Some("12345678000190".to_string()),
        subscriber_id,
        partner_id: None,
        branding: CompanyBranding::default(),
        contact: CompanyContact::default(),
    };
    overrides(&mut company);
    company
}

/// Create an active membership with role `member`.
pub fn create_test_membership(
    user_id: Uuid,
    company_id: Uuid,
    overrides: impl FnOnce(&mut MembershipProfile),
) -> MembershipProfile {
    let mut membership = MembershipProfile {
        id: Uuid::new_v4(),
        user_id,
        company_id,
        role: "member".to_string(),
        status: MembershipStatus::Active,
    };
    overrides(&mut membership);
    membership
}

pub fn create_test_partner(
    user_id: Uuid,
    overrides: impl FnOnce(&mut PartnerProfile),
) -> PartnerProfile {
    let mut partner = PartnerProfile {
        id: Uuid::new_v4(),
        user_id,
        status: PartnerStatus::Active,
    };
    overrides(&mut partner);
    partner
}

/// Create a pending withdrawal to an EVP key.
pub fn create_test_withdrawal(
    partner_id: Uuid,
    overrides: impl FnOnce(&mut WithdrawalProfile),
) -> WithdrawalProfile {
    let mut withdrawal = WithdrawalProfile {
        id: Uuid::new_v4(),
        partner_id,
        amount: 250.0,
        pix_key: "7d9f0b4e-3c1a-4e8b-9a42-5f6d2c8e1b07".to_string(),
        pix_key_type: PixKeyType::Evp,
        status: WithdrawalStatus::Pending,
        transfer_id: None,
        failure_reason: None,
        processed_at: None,
    };
    overrides(&mut withdrawal);
    withdrawal
}

/// Create a non-admin user profile.
pub fn create_test_profile(overrides: impl FnOnce(&mut UserProfile)) -> UserProfile {
    let mut profile = UserProfile {
        id: Uuid::new_v4(),
        email: "ana@example.com".to_string(),
        full_name: None,
        is_admin: false,
    };
    overrides(&mut profile);
    profile
}
