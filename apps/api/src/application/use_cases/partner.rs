use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::pix_transfer::{PixTransferGateway, PixTransferRequest},
        use_cases::cross_token::UserProfileRepoTrait,
    },
    domain::entities::partner::{PartnerStatus, PixKeyType, WithdrawalStatus},
};

#[async_trait]
pub trait PartnerRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<PartnerProfile>>;

    async fn get_withdrawal(&self, id: Uuid) -> AppResult<Option<WithdrawalProfile>>;

    /// Moves a withdrawal from `pending` to `processing`.
    /// Returns false if it was no longer pending.
    async fn claim_withdrawal(&self, id: Uuid) -> AppResult<bool>;

    /// Marks a withdrawal `paid`, recording the gateway transfer when there is one.
    async fn complete_withdrawal(&self, id: Uuid, transfer_id: Option<&str>) -> AppResult<()>;

    async fn fail_withdrawal(&self, id: Uuid, reason: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct PartnerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: PartnerStatus,
}

#[derive(Debug, Clone)]
pub struct WithdrawalProfile {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub amount: f64,
    pub pix_key: String,
    pub pix_key_type: PixKeyType,
    pub status: WithdrawalStatus,
    pub transfer_id: Option<String>,
    pub failure_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalResult {
    pub withdrawal_id: Uuid,
    pub status: WithdrawalStatus,
    pub transfer_id: Option<String>,
    /// "asaas" when a transfer was made, "manual" otherwise
    pub mode: &'static str,
}

#[derive(Clone)]
pub struct PartnerUseCases {
    partners: Arc<dyn PartnerRepoTrait>,
    profiles: Arc<dyn UserProfileRepoTrait>,
    pix: Option<Arc<dyn PixTransferGateway>>,
}

impl PartnerUseCases {
    pub fn new(
        partners: Arc<dyn PartnerRepoTrait>,
        profiles: Arc<dyn UserProfileRepoTrait>,
        pix: Option<Arc<dyn PixTransferGateway>>,
    ) -> Self {
        Self {
            partners,
            profiles,
            pix,
        }
    }

    /// Pays out a pending withdrawal. Admin only.
    ///
    /// Without a configured gateway the withdrawal is marked paid for manual
    /// settlement. A gateway failure marks it failed and surfaces as upstream error.
    pub async fn process_withdrawal(
        &self,
        admin_user_id: Uuid,
        withdrawal_id: Uuid,
    ) -> AppResult<WithdrawalResult> {
        let is_admin = self
            .profiles
            .get_by_id(admin_user_id)
            .await?
            .is_some_and(|p| p.is_admin);
        if !is_admin {
            return Err(AppError::Forbidden("Admin access required".into()));
        }

        let withdrawal = self
            .partners
            .get_withdrawal(withdrawal_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Withdrawal not found".into()))?;

        let not_pending = |status: WithdrawalStatus| {
            AppError::InvalidInput(format!(
                "Withdrawal is {status}; only pending withdrawals can be processed"
            ))
        };
        if withdrawal.status != WithdrawalStatus::Pending {
            return Err(not_pending(withdrawal.status));
        }
        if !self.partners.claim_withdrawal(withdrawal_id).await? {
            return Err(not_pending(WithdrawalStatus::Processing));
        }

        let Some(pix) = &self.pix else {
            self.partners.complete_withdrawal(withdrawal_id, None).await?;
            info!(%withdrawal_id, "Withdrawal marked paid for manual settlement");
            return Ok(WithdrawalResult {
                withdrawal_id,
                status: WithdrawalStatus::Paid,
                transfer_id: None,
                mode: "manual",
            });
        };

        let request = PixTransferRequest {
            amount: withdrawal.amount,
            pix_key: withdrawal.pix_key.clone(),
            pix_key_type: withdrawal.pix_key_type,
            description: format!("Sincla partner withdrawal {withdrawal_id}"),
            external_reference: withdrawal_id.to_string(),
        };

        match pix.transfer(&request).await {
            Ok(receipt) => {
                self.partners
                    .complete_withdrawal(withdrawal_id, Some(&receipt.id))
                    .await?;
                info!(
                    %withdrawal_id,
                    transfer_id = %receipt.id,
                    gateway_status = %receipt.status,
                    "PIX transfer created"
                );
                Ok(WithdrawalResult {
                    withdrawal_id,
                    status: WithdrawalStatus::Paid,
                    transfer_id: Some(receipt.id),
                    mode: "asaas",
                })
            }
            Err(e) => {
                error!(%withdrawal_id, error = %e, "PIX transfer failed");
                self.partners
                    .fail_withdrawal(withdrawal_id, &e.to_string())
                    .await?;
                Err(AppError::Upstream("PIX transfer failed".into()))
            }
        }
    }
}
