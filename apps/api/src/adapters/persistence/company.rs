use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::company::{
        CompanyBranding, CompanyContact, CompanyProfile, CompanyRepoTrait, ServerResolution,
    },
};

fn row_to_profile(row: &sqlx::postgres::PgRow) -> CompanyProfile {
    CompanyProfile {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        cnpj: row.get("cnpj"),
        subscriber_id: row.get("subscriber_id"),
        partner_id: row.get("partner_id"),
        branding: CompanyBranding {
            logo_url: row.get("logo_url"),
            favicon_url: row.get("favicon_url"),
            primary_color: row.get("primary_color"),
            secondary_color: row.get("secondary_color"),
            accent_color: row.get("accent_color"),
            description: row.get("description"),
        },
        contact: CompanyContact {
            email: row.get("contact_email"),
            phone: row.get("contact_phone"),
            whatsapp: row.get("contact_whatsapp"),
            website: row.get("website"),
            address: row.get("address"),
        },
    }
}

const SELECT_COLS: &str = r#"
    id, slug, name, cnpj, subscriber_id, partner_id,
    logo_url, favicon_url, primary_color, secondary_color, accent_color, description,
    contact_email, contact_phone, contact_whatsapp, website, address
"#;

#[async_trait]
impl CompanyRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<CompanyProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn resolve_server(&self, company_id: Uuid) -> AppResult<Option<ServerResolution>> {
        let row = sqlx::query(
            r#"
            SELECT mode, server_url, server_status,
                   COALESCE(has_dedicated_db, false) AS has_dedicated_db, db_config
            FROM resolve_company_server($1)
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|row| ServerResolution {
            mode: row.get("mode"),
            server_url: row.get("server_url"),
            server_status: row.get("server_status"),
            has_dedicated_db: row.get("has_dedicated_db"),
            db_config: row.get("db_config"),
        }))
    }
}
