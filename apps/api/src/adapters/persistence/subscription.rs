use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_text_column},
    app_error::{AppError, AppResult},
    application::use_cases::billing::{
        CreateSubscriptionInput, SubscriptionProfile, SubscriptionRepoTrait, SubscriptionState,
    },
    domain::entities::subscription::SubscriptionStatus,
};

fn row_to_profile(row: &sqlx::postgres::PgRow) -> SubscriptionProfile {
    let id: Uuid = row.get("id");
    let entity_id = id.to_string();
    let text = |column: &str| row.get::<Option<String>, _>(column);

    SubscriptionProfile {
        id,
        company_id: row.get("company_id"),
        product_id: row.get("product_id"),
        plan_id: row.get("plan_id"),
        plan: row.get("plan"),
        // Unknown statuses never grant access; updates leave the stored text alone
        status: text("status")
            .and_then(|s| parse_text_column(&s, "status", "subscription", &entity_id))
            .unwrap_or(SubscriptionStatus::Expired),
        billing_cycle: text("billing_cycle")
            .and_then(|s| parse_text_column(&s, "billing_cycle", "subscription", &entity_id)),
        current_period_start: row.get("current_period_start"),
        current_period_end: row.get("current_period_end"),
        canceled_at: row.get("canceled_at"),
        gateway: text("gateway")
            .and_then(|s| parse_text_column(&s, "gateway", "subscription", &entity_id)),
        gateway_subscription_id: row.get("gateway_subscription_id"),
        monthly_amount: row.get("monthly_amount"),
        version: row.get("version"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, company_id, product_id, plan_id, plan, status, billing_cycle,
    current_period_start, current_period_end, canceled_at, gateway,
    gateway_subscription_id, monthly_amount::float8 AS monthly_amount, version,
    created_at, updated_at
"#;

const CURRENT_STATUSES: &str = "('active', 'trialing')";

/// Every status text `SubscriptionStatus` parses, lowercased.
const KNOWN_STATUSES: &str =
    "('active', 'past_due', 'canceled', 'cancelled', 'trialing', 'paused', 'expired')";

/// Compare-and-swap update. A stored status outside `KNOWN_STATUSES` was read
/// as `expired` and is kept as is instead of being overwritten.
fn update_if_version_sql() -> String {
    format!(
        r#"
        UPDATE subscriptions
        SET plan_id = $3,
            plan = $4,
            status = CASE WHEN lower(status) IN {} THEN $5 ELSE status END,
            billing_cycle = $6,
            monthly_amount = $7::numeric,
            current_period_start = $8,
            current_period_end = $9,
            canceled_at = $10,
            version = version + 1,
            updated_at = now()
        WHERE id = $1 AND version = $2
        RETURNING {}
        "#,
        KNOWN_STATUSES, SELECT_COLS
    )
}

#[async_trait]
impl SubscriptionRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn get_by_gateway_subscription_id(
        &self,
        gateway_subscription_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE gateway_subscription_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLS
        ))
        .bind(gateway_subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn get_by_gateway_key(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        gateway_subscription_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE company_id = $1 AND product_id = $2 AND gateway_subscription_id = $3",
            SELECT_COLS
        ))
        .bind(company_id)
        .bind(product_id)
        .bind(gateway_subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn get_current(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE company_id = $1 AND product_id = $2 AND status IN {} ORDER BY created_at DESC LIMIT 1",
            SELECT_COLS, CURRENT_STATUSES
        ))
        .bind(company_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn get_latest(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE company_id = $1 AND product_id = $2 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLS
        ))
        .bind(company_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn create(&self, input: &CreateSubscriptionInput) -> AppResult<SubscriptionProfile> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO subscriptions (
                company_id, product_id, plan_id, plan, status, billing_cycle,
                current_period_start, current_period_end, gateway,
                gateway_subscription_id, monthly_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11::numeric)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(input.company_id)
        .bind(input.product_id)
        .bind(input.plan_id)
        .bind(&input.plan)
        .bind(input.status.as_ref())
        .bind(input.billing_cycle.as_ref())
        .bind(input.current_period_start)
        .bind(input.current_period_end)
        .bind(input.gateway.as_ref())
        .bind(&input.gateway_subscription_id)
        .bind(input.monthly_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_profile(&row))
    }

    async fn update_if_version(
        &self,
        id: Uuid,
        expected_version: i32,
        state: &SubscriptionState,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&update_if_version_sql())
            .bind(id)
            .bind(expected_version)
            .bind(state.plan_id)
            .bind(&state.plan)
            .bind(state.status.as_ref())
            .bind(state.billing_cycle.map(|c| c.as_ref().to_string()))
            .bind(state.monthly_amount)
            .bind(state.current_period_start)
            .bind(state.current_period_end)
            .bind(state.canceled_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }
}
