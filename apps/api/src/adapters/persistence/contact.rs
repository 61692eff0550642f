use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::contacts::{ContactFields, ContactRepoTrait},
};

impl PostgresPersistence {
    async fn find_contact_by(
        &self,
        column: &'static str,
        company_id: Uuid,
        value: &str,
    ) -> AppResult<Option<Uuid>> {
        let row = sqlx::query(&format!(
            "SELECT id FROM contacts WHERE company_id = $1 AND {} = $2 LIMIT 1",
            column
        ))
        .bind(company_id)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(|row| row.get("id")))
    }
}

#[async_trait]
impl ContactRepoTrait for PostgresPersistence {
    async fn find_by_email(&self, company_id: Uuid, email: &str) -> AppResult<Option<Uuid>> {
        self.find_contact_by("email", company_id, email).await
    }

    async fn find_by_cpf(&self, company_id: Uuid, cpf: &str) -> AppResult<Option<Uuid>> {
        self.find_contact_by("cpf", company_id, cpf).await
    }

    async fn find_by_whatsapp(&self, company_id: Uuid, whatsapp: &str) -> AppResult<Option<Uuid>> {
        self.find_contact_by("whatsapp", company_id, whatsapp).await
    }

    async fn insert(&self, contact: &ContactFields) -> AppResult<Uuid> {
        let row = sqlx::query(
            r#"
            INSERT INTO contacts (company_id, name, email, cpf, whatsapp, tags, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(contact.company_id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.cpf)
        .bind(&contact.whatsapp)
        .bind(&contact.tags)
        .bind(&contact.source)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.get("id"))
    }

    async fn update(&self, id: Uuid, contact: &ContactFields) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE contacts
            SET name = $2,
                email = COALESCE($3, email),
                cpf = COALESCE($4, cpf),
                whatsapp = COALESCE($5, whatsapp),
                tags = CASE WHEN cardinality($6::text[]) > 0 THEN $6 ELSE tags END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.cpf)
        .bind(&contact.whatsapp)
        .bind(&contact.tags)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }
}
