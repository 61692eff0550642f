use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::billing::{ProductPlanProfile, ProductProfile, ProductRepoTrait},
};

#[async_trait]
impl ProductRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<ProductProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, slug, name, webhook_url, webhook_secret, COALESCE(trial_days, 0) AS trial_days
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|row| ProductProfile {
            id: row.get("id"),
            slug: row.get("slug"),
            name: row.get("name"),
            webhook_url: row.get("webhook_url"),
            webhook_secret: row.get("webhook_secret"),
            trial_days: row.get("trial_days"),
        }))
    }

    async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<ProductPlanProfile>> {
        let row = sqlx::query("SELECT id, product_id, slug, name FROM product_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(|row| ProductPlanProfile {
            id: row.get("id"),
            product_id: row.get("product_id"),
            slug: row.get("slug"),
            name: row.get("name"),
        }))
    }
}
