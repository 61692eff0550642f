use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_text_column},
    app_error::{AppError, AppResult},
    application::use_cases::partner::{PartnerProfile, PartnerRepoTrait, WithdrawalProfile},
    domain::entities::partner::{PartnerStatus, PixKeyType, WithdrawalStatus},
};

fn row_to_withdrawal(row: &sqlx::postgres::PgRow) -> WithdrawalProfile {
    let id: Uuid = row.get("id");
    let entity_id = id.to_string();

    WithdrawalProfile {
        id,
        partner_id: row.get("partner_id"),
        amount: row.get("amount"),
        pix_key: row.get("pix_key"),
        pix_key_type: parse_text_column(
            row.get::<&str, _>("pix_key_type"),
            "pix_key_type",
            "partner_withdrawal",
            &entity_id,
        )
        .unwrap_or(PixKeyType::Evp),
        // Unknown statuses are never processable
        status: parse_text_column(
            row.get::<&str, _>("status"),
            "status",
            "partner_withdrawal",
            &entity_id,
        )
        .unwrap_or(WithdrawalStatus::Failed),
        transfer_id: row.get("transfer_id"),
        failure_reason: row.get("failure_reason"),
        processed_at: row.get("processed_at"),
    }
}

#[async_trait]
impl PartnerRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<PartnerProfile>> {
        let row = sqlx::query("SELECT id, user_id, status FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(|row| PartnerProfile {
            id: row.get("id"),
            user_id: row.get("user_id"),
            status: parse_text_column(
                row.get::<&str, _>("status"),
                "status",
                "partner",
                &id.to_string(),
            )
            .unwrap_or(PartnerStatus::Suspended),
        }))
    }

    async fn get_withdrawal(&self, id: Uuid) -> AppResult<Option<WithdrawalProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, partner_id, amount::float8 AS amount, pix_key, pix_key_type, status,
                   transfer_id, failure_reason, processed_at
            FROM partner_withdrawals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_withdrawal))
    }

    async fn claim_withdrawal(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE partner_withdrawals SET status = $2, updated_at = now() WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(WithdrawalStatus::Processing.as_ref())
        .bind(WithdrawalStatus::Pending.as_ref())
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected() == 1)
    }

    async fn complete_withdrawal(&self, id: Uuid, transfer_id: Option<&str>) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE partner_withdrawals
            SET status = $2, transfer_id = $3, failure_reason = NULL,
                processed_at = now(), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(WithdrawalStatus::Paid.as_ref())
        .bind(transfer_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn fail_withdrawal(&self, id: Uuid, reason: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE partner_withdrawals
            SET status = $2, failure_reason = $3, processed_at = now(), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(WithdrawalStatus::Failed.as_ref())
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }
}
