use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        use_cases::permission::MembershipRepoTrait,
        validators::{is_valid_email, normalize_cpf, normalize_whatsapp},
    },
};

pub const MAX_CONTACTS_PER_SYNC: usize = 1000;
pub const DEFAULT_CONTACT_SOURCE: &str = "sync";

#[async_trait]
pub trait ContactRepoTrait: Send + Sync {
    async fn find_by_email(&self, company_id: Uuid, email: &str) -> AppResult<Option<Uuid>>;

    async fn find_by_cpf(&self, company_id: Uuid, cpf: &str) -> AppResult<Option<Uuid>>;

    async fn find_by_whatsapp(&self, company_id: Uuid, whatsapp: &str) -> AppResult<Option<Uuid>>;

    async fn insert(&self, contact: &ContactFields) -> AppResult<Uuid>;

    /// Overwrites the fields that are present, keeps the stored value otherwise.
    async fn update(&self, id: Uuid, contact: &ContactFields) -> AppResult<()>;
}

/// One contact as sent by a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A validated, normalized contact ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactFields {
    pub company_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub whatsapp: Option<String>,
    pub tags: Vec<String>,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Normalizes a contact. Identifiers that do not validate are dropped and
/// reported in `errors`. Returns None when nothing usable is left.
fn normalize_contact(
    company_id: Uuid,
    index: usize,
    input: ContactInput,
    errors: &mut Vec<String>,
) -> Option<ContactFields> {
    let name = non_blank(input.name.as_deref())?.to_string();

    let email = non_blank(input.email.as_deref()).and_then(|raw| {
        if is_valid_email(raw) {
            Some(raw.to_lowercase())
        } else {
            errors.push(format!("contact {index}: invalid email {raw:?}"));
            None
        }
    });
    let cpf = non_blank(input.cpf.as_deref()).and_then(|raw| {
        normalize_cpf(raw).or_else(|| {
            errors.push(format!("contact {index}: invalid cpf"));
            None
        })
    });
    let whatsapp = non_blank(input.whatsapp.as_deref()).and_then(|raw| {
        normalize_whatsapp(raw).or_else(|| {
            errors.push(format!("contact {index}: invalid whatsapp {raw:?}"));
            None
        })
    });

    if email.is_none() && cpf.is_none() && whatsapp.is_none() {
        return None;
    }

    Some(ContactFields {
        company_id,
        name,
        email,
        cpf,
        whatsapp,
        tags: input.tags,
        source: non_blank(input.source.as_deref())
            .unwrap_or(DEFAULT_CONTACT_SOURCE)
            .to_string(),
    })
}

#[derive(Clone)]
pub struct ContactUseCases {
    contacts: Arc<dyn ContactRepoTrait>,
    memberships: Arc<dyn MembershipRepoTrait>,
}

impl ContactUseCases {
    pub fn new(
        contacts: Arc<dyn ContactRepoTrait>,
        memberships: Arc<dyn MembershipRepoTrait>,
    ) -> Self {
        Self {
            contacts,
            memberships,
        }
    }

    /// Upserts contacts into a company's address book.
    ///
    /// Matching is by email, then cpf, then whatsapp; the first hit wins.
    /// Per-contact failures are reported, they never abort the batch.
    pub async fn sync(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        contacts: Vec<ContactInput>,
    ) -> AppResult<SyncReport> {
        if contacts.len() > MAX_CONTACTS_PER_SYNC {
            return Err(AppError::InvalidInput(format!(
                "At most {MAX_CONTACTS_PER_SYNC} contacts per request"
            )));
        }
        if self
            .memberships
            .get_active(user_id, company_id)
            .await?
            .is_none()
        {
            return Err(AppError::Forbidden(
                "User is not a member of this company".into(),
            ));
        }

        let mut report = SyncReport::default();

        for (index, input) in contacts.into_iter().enumerate() {
            let Some(fields) = normalize_contact(company_id, index, input, &mut report.errors)
            else {
                report.skipped += 1;
                continue;
            };

            match self.upsert(&fields).await {
                Ok(true) => report.inserted += 1,
                Ok(false) => report.updated += 1,
                Err(e) => {
                    warn!(%company_id, index, error = %e, "Contact upsert failed");
                    report.errors.push(format!("contact {index}: {e}"));
                }
            }
        }

        info!(
            %company_id,
            inserted = report.inserted,
            updated = report.updated,
            skipped = report.skipped,
            errors = report.errors.len(),
            "Contacts synced"
        );

        Ok(report)
    }

    /// Returns true when a new row was inserted.
    async fn upsert(&self, fields: &ContactFields) -> AppResult<bool> {
        let company_id = fields.company_id;
        let mut existing = None;

        if let Some(email) = fields.email.as_deref() {
            existing = self.contacts.find_by_email(company_id, email).await?;
        }
        if existing.is_none() {
            if let Some(cpf) = fields.cpf.as_deref() {
                existing = self.contacts.find_by_cpf(company_id, cpf).await?;
            }
        }
        if existing.is_none() {
            if let Some(whatsapp) = fields.whatsapp.as_deref() {
                existing = self.contacts.find_by_whatsapp(company_id, whatsapp).await?;
            }
        }

        match existing {
            Some(id) => {
                self.contacts.update(id, fields).await?;
                Ok(false)
            }
            None => {
                self.contacts.insert(fields).await?;
                Ok(true)
            }
        }
    }
}
