use std::sync::Arc;

use crate::{
    application::use_cases::{
        assets::AssetUseCases, billing::BillingUseCases, company::CompanyUseCases,
        contacts::ContactUseCases, cross_token::CrossTokenUseCases, notifier::ProductNotifier,
        partner::PartnerUseCases, permission::PermissionUseCases,
    },
    infra::{config::AppConfig, webhook_signature::SignatureVerifier},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub signature_verifier: Arc<SignatureVerifier>,
    pub billing_use_cases: Arc<BillingUseCases>,
    pub notifier: Arc<ProductNotifier>,
    pub permission_use_cases: Arc<PermissionUseCases>,
    pub cross_token_use_cases: Arc<CrossTokenUseCases>,
    pub company_use_cases: Arc<CompanyUseCases>,
    pub contact_use_cases: Arc<ContactUseCases>,
    pub partner_use_cases: Arc<PartnerUseCases>,
    pub asset_use_cases: Arc<AssetUseCases>,
}
