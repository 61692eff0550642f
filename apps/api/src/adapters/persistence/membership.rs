use async_trait::async_trait;
use sincla_types::AccessLevel;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_text_column},
    app_error::{AppError, AppResult},
    application::use_cases::permission::{MembershipProfile, MembershipRepoTrait},
    domain::entities::membership::MembershipStatus,
};

#[async_trait]
impl MembershipRepoTrait for PostgresPersistence {
    async fn get_active(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<Option<MembershipProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, company_id, role
            FROM company_members
            WHERE user_id = $1 AND company_id = $2 AND status = $3
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .bind(MembershipStatus::Active.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|row| MembershipProfile {
            id: row.get("id"),
            user_id: row.get("user_id"),
            company_id: row.get("company_id"),
            role: row.get("role"),
            status: MembershipStatus::Active,
        }))
    }

    async fn get_product_access(
        &self,
        member_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<AccessLevel>> {
        let level: Option<String> = sqlx::query(
            r#"
            SELECT access_level
            FROM member_product_access
            WHERE company_member_id = $1 AND product_id = $2
            "#,
        )
        .bind(member_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .and_then(|row| row.get("access_level"));

        Ok(level.and_then(|raw| {
            parse_text_column(
                &raw,
                "access_level",
                "member_product_access",
                &member_id.to_string(),
            )
        }))
    }
}
