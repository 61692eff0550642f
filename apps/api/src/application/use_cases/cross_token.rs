use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use sincla_types::{
    AccessLevel, CROSS_TOKEN_ISSUER, CROSS_TOKEN_TTL_SECS, CrossTokenClaims, JwtError,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        jwt,
        use_cases::{
            billing::{ProductRepoTrait, SubscriptionProfile, SubscriptionRepoTrait},
            company::CompanyRepoTrait,
            permission::MembershipRepoTrait,
        },
    },
};

/// Plan code used when a subscription carries no plan reference.
pub const DEFAULT_PLAN_CODE: &str = "pro";

#[async_trait]
pub trait UserProfileRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>>;
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedCrossToken {
    pub token: String,
    pub expires_at: String,
}

#[derive(Clone)]
pub struct CrossTokenUseCases {
    memberships: Arc<dyn MembershipRepoTrait>,
    subscriptions: Arc<dyn SubscriptionRepoTrait>,
    products: Arc<dyn ProductRepoTrait>,
    companies: Arc<dyn CompanyRepoTrait>,
    profiles: Arc<dyn UserProfileRepoTrait>,
    secret: SecretString,
}

impl CrossTokenUseCases {
    pub fn new(
        memberships: Arc<dyn MembershipRepoTrait>,
        subscriptions: Arc<dyn SubscriptionRepoTrait>,
        products: Arc<dyn ProductRepoTrait>,
        companies: Arc<dyn CompanyRepoTrait>,
        profiles: Arc<dyn UserProfileRepoTrait>,
        secret: SecretString,
    ) -> Self {
        Self {
            memberships,
            subscriptions,
            products,
            companies,
            profiles,
            secret,
        }
    }

    /// Issues a 5-minute token that lets `user_id` enter `product_id` as a
    /// member of `company_id`.
    pub async fn issue(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<IssuedCrossToken> {
        let membership = self
            .memberships
            .get_active(user_id, company_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("User is not a member of this company".into()))?;

        let subscription = self
            .subscriptions
            .get_current(company_id, product_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden(
                    "Company does not have an active subscription to this product".into(),
                )
            })?;

        let access_level = if membership.is_owner() {
            AccessLevel::Admin
        } else {
            self.memberships
                .get_product_access(membership.id, product_id)
                .await?
                .ok_or_else(|| {
                    AppError::Forbidden("User does not have access to this product".into())
                })?
        };

        let company = self
            .companies
            .get_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;
        let profile = self
            .profiles
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".into()))?;

        let plan_code = self.plan_code(&subscription).await?;
        let iat = Utc::now().timestamp();
        let exp = iat + CROSS_TOKEN_TTL_SECS;

        let claims = CrossTokenClaims {
            sub: user_id.to_string(),
            name: profile
                .full_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| profile.email.clone()),
            email: profile.email,
            company: company.to_claims(),
            role: membership.role,
            access_level,
            product_id: product_id.to_string(),
            plan_code,
            branding: company.branding_claims(),
            iat,
            exp,
            iss: CROSS_TOKEN_ISSUER.to_string(),
        };

        let token = jwt::issue_cross_token(&claims, &self.secret)?;
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0)
            .ok_or_else(|| AppError::Internal("Token expiry out of range".into()))?
            .to_rfc3339();

        info!(%user_id, %company_id, %product_id, %access_level, "Cross-token issued");

        Ok(IssuedCrossToken { token, expires_at })
    }

    async fn plan_code(&self, subscription: &SubscriptionProfile) -> AppResult<String> {
        if let Some(plan_id) = subscription.plan_id {
            if let Some(plan) = self.products.get_plan(plan_id).await? {
                return Ok(plan.slug);
            }
        }
        Ok(subscription
            .plan
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PLAN_CODE.to_string()))
    }

    /// Signature, issuer and expiry check. No database access, no leeway.
    pub fn validate(&self, token: &str) -> Result<CrossTokenClaims, JwtError> {
        jwt::verify_cross_token(token, &self.secret)
    }
}
