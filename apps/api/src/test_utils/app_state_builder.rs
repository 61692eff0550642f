//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates a complete `AppState`
//! with in-memory mocks for testing HTTP endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use sincla_types::AccessLevel;
use url::Url;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::{object_storage::ObjectStorage, pix_transfer::PixTransferGateway},
        use_cases::{
            assets::AssetUseCases,
            billing::{BillingUseCases, ProductPlanProfile, ProductProfile, SubscriptionProfile},
            company::{CompanyProfile, CompanyUseCases, ServerResolution},
            contacts::ContactUseCases,
            cross_token::{CrossTokenUseCases, UserProfile},
            notifier::ProductNotifier,
            partner::{PartnerProfile, PartnerUseCases, WithdrawalProfile},
            permission::{MembershipProfile, PermissionUseCases},
        },
    },
    infra::{config::AppConfig, webhook_signature::SignatureVerifier},
    test_utils::{
        InMemoryCompanyRepo, InMemoryContactRepo, InMemoryMembershipRepo, InMemoryObjectStorage,
        InMemoryPartnerRepo, InMemoryProductRepo, InMemorySubscriptionRepo,
        InMemoryUserProfileRepo, RecordingWebhookSender, TEST_ASAAS_TOKEN,
        TEST_CROSS_TOKEN_SECRET, TEST_HUB_SECRET, TEST_STRIPE_SECRET,
    },
};

/// Handles on the mocks behind a built `AppState`, for assertions.
pub struct TestMocks {
    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub partners: Arc<InMemoryPartnerRepo>,
    pub contacts: Arc<InMemoryContactRepo>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub webhooks: Arc<RecordingWebhookSender>,
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let company = create_test_company(owner_id, |_| {});
/// let subscription = create_test_subscription(company.id, product.id, |_| {});
///
/// let app_state = TestAppStateBuilder::new()
///     .with_company(company)
///     .with_product(product)
///     .with_subscription(subscription)
///     .build();
/// ```
pub struct TestAppStateBuilder {
    subscriptions: Vec<SubscriptionProfile>,
    products: Vec<ProductProfile>,
    plans: Vec<ProductPlanProfile>,
    companies: Vec<CompanyProfile>,
    servers: Vec<(Uuid, ServerResolution)>,
    memberships: Vec<(MembershipProfile, Option<(Uuid, AccessLevel)>)>,
    partners: Vec<PartnerProfile>,
    withdrawals: Vec<WithdrawalProfile>,
    profiles: Vec<UserProfile>,
    stripe_secret: Option<&'static str>,
    asaas_token: Option<&'static str>,
    pix: Option<Arc<dyn PixTransferGateway>>,
    storage_enabled: bool,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    /// Create a new builder with both webhook secrets configured, no PIX
    /// gateway and storage enabled.
    pub fn new() -> Self {
        Self {
            subscriptions: vec![],
            products: vec![],
            plans: vec![],
            companies: vec![],
            servers: vec![],
            memberships: vec![],
            partners: vec![],
            withdrawals: vec![],
            profiles: vec![],
            stripe_secret: Some(TEST_STRIPE_SECRET),
            asaas_token: Some(TEST_ASAAS_TOKEN),
            pix: None,
            storage_enabled: true,
        }
    }

    pub fn with_subscription(mut self, subscription: SubscriptionProfile) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_product(mut self, product: ProductProfile) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_plan(mut self, plan: ProductPlanProfile) -> Self {
        self.plans.push(plan);
        self
    }

    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.companies.push(company);
        self
    }

    pub fn with_server(mut self, company_id: Uuid, resolution: ServerResolution) -> Self {
        self.servers.push((company_id, resolution));
        self
    }

    /// Add a membership, optionally with an access level for one product.
    pub fn with_membership(
        mut self,
        membership: MembershipProfile,
        access: Option<(Uuid, AccessLevel)>,
    ) -> Self {
        self.memberships.push((membership, access));
        self
    }

    pub fn with_partner(mut self, partner: PartnerProfile) -> Self {
        self.partners.push(partner);
        self
    }

    pub fn with_withdrawal(mut self, withdrawal: WithdrawalProfile) -> Self {
        self.withdrawals.push(withdrawal);
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Accept Stripe-style calls without verifying their signature.
    pub fn without_stripe_secret(mut self) -> Self {
        self.stripe_secret = None;
        self
    }

    pub fn with_pix_gateway(mut self, pix: Arc<dyn PixTransferGateway>) -> Self {
        self.pix = Some(pix);
        self
    }

    pub fn without_storage(mut self) -> Self {
        self.storage_enabled = false;
        self
    }

    fn config(&self) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/sincla_test".to_string(),
            db_max_connections: 1,
            run_migrations: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            hub_jwt_secret: SecretString::new(TEST_HUB_SECRET.into()),
            cross_token_secret: SecretString::new(TEST_CROSS_TOKEN_SECRET.into()),
            stripe_webhook_secret: self.stripe_secret.map(|s| SecretString::new(s.into())),
            asaas_webhook_token: self.asaas_token.map(|s| SecretString::new(s.into())),
            asaas_api_key: None,
            asaas_api_url: Url::parse("https://sandbox.asaas.test").unwrap(),
            storage_url: None,
            storage_service_key: None,
            storage_bucket: "assets".to_string(),
        }
    }

    /// Build the AppState with all configured mocks.
    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    /// Build the AppState and return the mocks it runs on.
    pub fn build_with_mocks(self) -> (AppState, TestMocks) {
        let config = self.config();

        let subscriptions = Arc::new(InMemorySubscriptionRepo::with_subscriptions(
            self.subscriptions,
        ));
        let products = Arc::new(InMemoryProductRepo::with_products(self.products));
        for plan in self.plans {
            products.add_plan(plan);
        }
        let companies = Arc::new(InMemoryCompanyRepo::with_companies(self.companies));
        for (company_id, resolution) in self.servers {
            companies.set_server(company_id, resolution);
        }
        let memberships = Arc::new(InMemoryMembershipRepo::default());
        for (membership, access) in self.memberships {
            memberships.add(membership, access);
        }
        let partners = Arc::new(InMemoryPartnerRepo::default());
        for partner in self.partners {
            partners.add(partner);
        }
        for withdrawal in self.withdrawals {
            partners.add_withdrawal(withdrawal);
        }
        let profiles = Arc::new(InMemoryUserProfileRepo::with_profiles(self.profiles));
        let contacts = Arc::new(InMemoryContactRepo::default());
        let storage = Arc::new(InMemoryObjectStorage::default());
        let webhooks = Arc::new(RecordingWebhookSender::default());

        let signature_verifier = SignatureVerifier::new(
            config.stripe_webhook_secret.clone(),
            config.asaas_webhook_token.clone(),
        );
        let cross_token_use_cases = CrossTokenUseCases::new(
            memberships.clone(),
            subscriptions.clone(),
            products.clone(),
            companies.clone(),
            profiles.clone(),
            config.cross_token_secret.clone(),
        );

        let app_state = AppState {
            signature_verifier: Arc::new(signature_verifier),
            billing_use_cases: Arc::new(BillingUseCases::new(
                subscriptions.clone(),
                products.clone(),
            )),
            notifier: Arc::new(ProductNotifier::new(
                products.clone(),
                subscriptions.clone(),
                webhooks.clone(),
            )),
            permission_use_cases: Arc::new(PermissionUseCases::new(
                subscriptions.clone(),
                companies.clone(),
                partners.clone(),
                memberships.clone(),
            )),
            cross_token_use_cases: Arc::new(cross_token_use_cases),
            company_use_cases: Arc::new(CompanyUseCases::new(companies)),
            contact_use_cases: Arc::new(ContactUseCases::new(contacts.clone(), memberships)),
            partner_use_cases: Arc::new(PartnerUseCases::new(
                partners.clone(),
                profiles,
                self.pix,
            )),
            asset_use_cases: Arc::new(AssetUseCases::new(
                self.storage_enabled
                    .then(|| storage.clone() as Arc<dyn ObjectStorage>),
            )),
            config: Arc::new(config),
        };

        (
            app_state,
            TestMocks {
                subscriptions,
                partners,
                contacts,
                storage,
                webhooks,
            },
        )
    }
}
