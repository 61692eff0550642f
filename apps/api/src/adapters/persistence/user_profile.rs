use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::cross_token::{UserProfile, UserProfileRepoTrait},
};

#[async_trait]
impl UserProfileRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name, COALESCE(is_admin, false) AS is_admin
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|row| UserProfile {
            id: row.get("id"),
            email: row.get::<Option<String>, _>("email").unwrap_or_default(),
            full_name: row.get("full_name"),
            is_admin: row.get("is_admin"),
        }))
    }
}
