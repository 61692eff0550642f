use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sincla_types::{BrandingClaims, CompanyClaims};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::is_hex_color,
};

pub const DEFAULT_PRIMARY_COLOR: &str = "#6366F1";
pub const DEFAULT_SECONDARY_COLOR: &str = "#8B5CF6";
pub const DEFAULT_ACCENT_COLOR: &str = "#EC4899";

#[async_trait]
pub trait CompanyRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<CompanyProfile>>;

    /// Delegates to the database-side `resolve_company_server` function.
    async fn resolve_server(&self, company_id: Uuid) -> AppResult<Option<ServerResolution>>;
}

#[derive(Debug, Clone, Default)]
pub struct CompanyBranding {
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub cnpj: Option<String>,
    /// Owner of the company
    pub subscriber_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub branding: CompanyBranding,
    pub contact: CompanyContact,
}

impl CompanyProfile {
    pub fn to_claims(&self) -> CompanyClaims {
        CompanyClaims {
            id: self.id.to_string(),
            slug: self.slug.clone(),
            name: self.name.clone(),
            cnpj: self.cnpj.clone(),
        }
    }

    pub fn branding_claims(&self) -> BrandingClaims {
        BrandingClaims {
            logo_url: self.branding.logo_url.clone(),
            favicon_url: self.branding.favicon_url.clone(),
            primary_color: self.branding.primary_color.clone(),
            secondary_color: self.branding.secondary_color.clone(),
            accent_color: self.branding.accent_color.clone(),
            description: self.branding.description.clone(),
        }
    }
}

/// Where a company's product backend runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerResolution {
    pub mode: String,
    pub server_url: Option<String>,
    pub server_status: Option<String>,
    pub has_dedicated_db: bool,
    pub db_config: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyBrandingResponse {
    pub company_id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub description: Option<String>,
    pub contact: CompanyContact,
}

fn color_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|c| is_hex_color(c))
        .unwrap_or(default)
        .to_string()
}

#[derive(Clone)]
pub struct CompanyUseCases {
    repo: Arc<dyn CompanyRepoTrait>,
}

impl CompanyUseCases {
    pub fn new(repo: Arc<dyn CompanyRepoTrait>) -> Self {
        Self { repo }
    }

    pub async fn get_branding(&self, company_id: Uuid) -> AppResult<CompanyBrandingResponse> {
        let company = self
            .repo
            .get_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;
        let branding = &company.branding;

        Ok(CompanyBrandingResponse {
            company_id: company.id,
            primary_color: color_or(branding.primary_color.as_deref(), DEFAULT_PRIMARY_COLOR),
            secondary_color: color_or(branding.secondary_color.as_deref(), DEFAULT_SECONDARY_COLOR),
            accent_color: color_or(branding.accent_color.as_deref(), DEFAULT_ACCENT_COLOR),
            logo_url: branding.logo_url.clone(),
            favicon_url: branding.favicon_url.clone(),
            description: branding.description.clone(),
            name: company.name,
            slug: company.slug,
            contact: company.contact,
        })
    }

    pub async fn resolve_server(&self, company_id: Uuid) -> AppResult<ServerResolution> {
        self.repo
            .resolve_server(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".into()))
    }
}
