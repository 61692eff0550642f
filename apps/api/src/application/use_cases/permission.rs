use std::sync::Arc;

use async_trait::async_trait;
use sincla_types::{AccessLevel, GrantedBy, PermissionResponse};
use tracing::debug;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::use_cases::{
        billing::SubscriptionRepoTrait, company::CompanyRepoTrait, partner::PartnerRepoTrait,
    },
    domain::entities::{
        membership::{MembershipStatus, OWNER_ROLE},
        partner::PartnerStatus,
    },
};

pub const PARTNER_ROLE: &str = "partner";

#[async_trait]
pub trait MembershipRepoTrait: Send + Sync {
    /// Active membership of `user_id` in `company_id`.
    async fn get_active(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<Option<MembershipProfile>>;

    async fn get_product_access(
        &self,
        member_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<AccessLevel>>;
}

#[derive(Debug, Clone)]
pub struct MembershipProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: String,
    pub status: MembershipStatus,
}

impl MembershipProfile {
    pub fn is_owner(&self) -> bool {
        self.role.eq_ignore_ascii_case(OWNER_ROLE)
    }
}

#[derive(Clone)]
pub struct PermissionUseCases {
    subscriptions: Arc<dyn SubscriptionRepoTrait>,
    companies: Arc<dyn CompanyRepoTrait>,
    partners: Arc<dyn PartnerRepoTrait>,
    memberships: Arc<dyn MembershipRepoTrait>,
}

impl PermissionUseCases {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepoTrait>,
        companies: Arc<dyn CompanyRepoTrait>,
        partners: Arc<dyn PartnerRepoTrait>,
        memberships: Arc<dyn MembershipRepoTrait>,
    ) -> Self {
        Self {
            subscriptions,
            companies,
            partners,
            memberships,
        }
    }

    /// Derives the access tier of a user inside a product, walking
    /// subscription, ownership, partnership and membership in that order.
    /// The first rule that matches decides.
    pub async fn resolve(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<PermissionResponse> {
        if self
            .subscriptions
            .get_current(company_id, product_id)
            .await?
            .is_none()
        {
            return Ok(PermissionResponse::no_subscription());
        }

        if let Some(company) = self.companies.get_by_id(company_id).await? {
            if company.subscriber_id == user_id {
                return Ok(PermissionResponse::granted(
                    AccessLevel::Advanced,
                    GrantedBy::Owner,
                    OWNER_ROLE,
                ));
            }

            if let Some(partner_id) = company.partner_id {
                let partner = self.partners.get_by_id(partner_id).await?;
                if partner
                    .is_some_and(|p| p.status == PartnerStatus::Active && p.user_id == user_id)
                {
                    return Ok(PermissionResponse::granted(
                        AccessLevel::Advanced,
                        GrantedBy::Partner,
                        PARTNER_ROLE,
                    ));
                }
            }
        }

        let Some(membership) = self.memberships.get_active(user_id, company_id).await? else {
            debug!(%user_id, %company_id, "No active membership");
            return Ok(PermissionResponse::no_membership());
        };

        match self
            .memberships
            .get_product_access(membership.id, product_id)
            .await?
        {
            Some(level) => Ok(PermissionResponse::granted(
                level,
                GrantedBy::Member,
                &membership.role,
            )),
            None => Ok(PermissionResponse {
                company_role: Some(membership.role),
                ..PermissionResponse::no_membership()
            }),
        }
    }
}
