//! In-memory mocks for companies, memberships, partners, profiles and contacts.

use async_trait::async_trait;
use chrono::Utc;
use sincla_types::AccessLevel;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::use_cases::{
        company::{CompanyProfile, CompanyRepoTrait, ServerResolution},
        contacts::{ContactFields, ContactRepoTrait},
        cross_token::{UserProfile, UserProfileRepoTrait},
        partner::{PartnerProfile, PartnerRepoTrait, WithdrawalProfile},
        permission::{MembershipProfile, MembershipRepoTrait},
    },
    domain::entities::{membership::MembershipStatus, partner::WithdrawalStatus},
};

// ============================================================================
// InMemoryCompanyRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryCompanyRepo {
    pub companies: Mutex<HashMap<Uuid, CompanyProfile>>,
    pub servers: Mutex<HashMap<Uuid, ServerResolution>>,
}

impl InMemoryCompanyRepo {
    pub fn with_companies(companies: Vec<CompanyProfile>) -> Self {
        Self {
            companies: Mutex::new(companies.into_iter().map(|c| (c.id, c)).collect()),
            servers: Mutex::new(HashMap::new()),
        }
    }

    /// Answer `resolve_server` returns for `company_id`.
    pub fn set_server(&self, company_id: Uuid, resolution: ServerResolution) {
        self.servers.lock().unwrap().insert(company_id, resolution);
    }

    pub fn set_partner(&self, company_id: Uuid, partner_id: Uuid) {
        if let Some(company) = self.companies.lock().unwrap().get_mut(&company_id) {
            company.partner_id = Some(partner_id);
        }
    }
}

#[async_trait]
impl CompanyRepoTrait for InMemoryCompanyRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<CompanyProfile>> {
        Ok(self.companies.lock().unwrap().get(&id).cloned())
    }

    async fn resolve_server(&self, company_id: Uuid) -> AppResult<Option<ServerResolution>> {
        Ok(self.servers.lock().unwrap().get(&company_id).cloned())
    }
}

// ============================================================================
// InMemoryMembershipRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryMembershipRepo {
    pub memberships: Mutex<Vec<MembershipProfile>>,
    /// (member_id, product_id) -> level
    pub access: Mutex<HashMap<(Uuid, Uuid), AccessLevel>>,
}

impl InMemoryMembershipRepo {
    /// Adds a membership, optionally with an access level for one product.
    pub fn add(&self, membership: MembershipProfile, access: Option<(Uuid, AccessLevel)>) {
        if let Some((product_id, level)) = access {
            self.access
                .lock()
                .unwrap()
                .insert((membership.id, product_id), level);
        }
        self.memberships.lock().unwrap().push(membership);
    }
}

#[async_trait]
impl MembershipRepoTrait for InMemoryMembershipRepo {
    async fn get_active(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<Option<MembershipProfile>> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .find(|m| {
                m.user_id == user_id
                    && m.company_id == company_id
                    && m.status == MembershipStatus::Active
            })
            .cloned())
    }

    async fn get_product_access(
        &self,
        member_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<AccessLevel>> {
        Ok(self
            .access
            .lock()
            .unwrap()
            .get(&(member_id, product_id))
            .copied())
    }
}

// ============================================================================
// InMemoryPartnerRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryPartnerRepo {
    pub partners: Mutex<HashMap<Uuid, PartnerProfile>>,
    pub withdrawals: Mutex<HashMap<Uuid, WithdrawalProfile>>,
}

impl InMemoryPartnerRepo {
    pub fn add(&self, partner: PartnerProfile) {
        self.partners.lock().unwrap().insert(partner.id, partner);
    }

    pub fn add_withdrawal(&self, withdrawal: WithdrawalProfile) {
        self.withdrawals
            .lock()
            .unwrap()
            .insert(withdrawal.id, withdrawal);
    }

    pub fn withdrawal(&self, id: Uuid) -> Option<WithdrawalProfile> {
        self.withdrawals.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PartnerRepoTrait for InMemoryPartnerRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<PartnerProfile>> {
        Ok(self.partners.lock().unwrap().get(&id).cloned())
    }

    async fn get_withdrawal(&self, id: Uuid) -> AppResult<Option<WithdrawalProfile>> {
        Ok(self.withdrawal(id))
    }

    async fn claim_withdrawal(&self, id: Uuid) -> AppResult<bool> {
        let mut withdrawals = self.withdrawals.lock().unwrap();
        match withdrawals.get_mut(&id) {
            Some(w) if w.status == WithdrawalStatus::Pending => {
                w.status = WithdrawalStatus::Processing;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete_withdrawal(&self, id: Uuid, transfer_id: Option<&str>) -> AppResult<()> {
        if let Some(w) = self.withdrawals.lock().unwrap().get_mut(&id) {
            w.status = WithdrawalStatus::Paid;
            w.transfer_id = transfer_id.map(str::to_string);
            w.processed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn fail_withdrawal(&self, id: Uuid, reason: &str) -> AppResult<()> {
        if let Some(w) = self.withdrawals.lock().unwrap().get_mut(&id) {
            w.status = WithdrawalStatus::Failed;
            w.failure_reason = Some(reason.to_string());
            w.processed_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ============================================================================
// InMemoryUserProfileRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserProfileRepo {
    pub profiles: Mutex<HashMap<Uuid, UserProfile>>,
}

impl InMemoryUserProfileRepo {
    pub fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl UserProfileRepoTrait for InMemoryUserProfileRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }
}

// ============================================================================
// InMemoryContactRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryContactRepo {
    pub contacts: Mutex<Vec<(Uuid, ContactFields)>>,
}

impl InMemoryContactRepo {
    pub fn all(&self) -> Vec<ContactFields> {
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    fn find(
        &self,
        company_id: Uuid,
        matches: impl Fn(&ContactFields) -> bool,
    ) -> Option<Uuid> {
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .find(|(_, c)| c.company_id == company_id && matches(c))
            .map(|(id, _)| *id)
    }
}

#[async_trait]
impl ContactRepoTrait for InMemoryContactRepo {
    async fn find_by_email(&self, company_id: Uuid, email: &str) -> AppResult<Option<Uuid>> {
        Ok(self.find(company_id, |c| c.email.as_deref() == Some(email)))
    }

    async fn find_by_cpf(&self, company_id: Uuid, cpf: &str) -> AppResult<Option<Uuid>> {
        Ok(self.find(company_id, |c| c.cpf.as_deref() == Some(cpf)))
    }

    async fn find_by_whatsapp(&self, company_id: Uuid, whatsapp: &str) -> AppResult<Option<Uuid>> {
        Ok(self.find(company_id, |c| c.whatsapp.as_deref() == Some(whatsapp)))
    }

    async fn insert(&self, contact: &ContactFields) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        self.contacts.lock().unwrap().push((id, contact.clone()));
        Ok(id)
    }

    async fn update(&self, id: Uuid, contact: &ContactFields) -> AppResult<()> {
        let mut contacts = self.contacts.lock().unwrap();
        if let Some((_, stored)) = contacts.iter_mut().find(|(row_id, _)| *row_id == id) {
            stored.name = contact.name.clone();
            if contact.email.is_some() {
                stored.email = contact.email.clone();
            }
            if contact.cpf.is_some() {
                stored.cpf = contact.cpf.clone();
            }
            if contact.whatsapp.is_some() {
                stored.whatsapp = contact.whatsapp.clone();
            }
            if !contact.tags.is_empty() {
                stored.tags = contact.tags.clone();
            }
        }
        Ok(())
    }
}
