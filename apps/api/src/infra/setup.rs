use std::fs::File;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    application::{
        ports::{
            object_storage::ObjectStorage, pix_transfer::PixTransferGateway,
            product_webhook::ProductWebhookSender,
        },
        use_cases::{
            assets::AssetUseCases,
            billing::{BillingUseCases, ProductRepoTrait, SubscriptionRepoTrait},
            company::{CompanyRepoTrait, CompanyUseCases},
            contacts::{ContactRepoTrait, ContactUseCases},
            cross_token::{CrossTokenUseCases, UserProfileRepoTrait},
            notifier::ProductNotifier,
            partner::{PartnerRepoTrait, PartnerUseCases},
            permission::{MembershipRepoTrait, PermissionUseCases},
        },
    },
    infra::{
        asaas_client::AsaasClient,
        config::AppConfig,
        db::{init_db, run_migrations},
        error::InfraError,
        http_client::try_build_client,
        object_storage::HttpObjectStorage,
        product_webhook_client::HttpProductWebhookSender,
        webhook_signature::SignatureVerifier,
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env()?;

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    let postgres_arc = Arc::new(PostgresPersistence::new(pool));

    let http = try_build_client().map_err(InfraError::HttpClient)?;

    let subscription_repo = postgres_arc.clone() as Arc<dyn SubscriptionRepoTrait>;
    let product_repo = postgres_arc.clone() as Arc<dyn ProductRepoTrait>;
    let company_repo = postgres_arc.clone() as Arc<dyn CompanyRepoTrait>;
    let membership_repo = postgres_arc.clone() as Arc<dyn MembershipRepoTrait>;
    let partner_repo = postgres_arc.clone() as Arc<dyn PartnerRepoTrait>;
    let profile_repo = postgres_arc.clone() as Arc<dyn UserProfileRepoTrait>;
    let contact_repo = postgres_arc.clone() as Arc<dyn ContactRepoTrait>;

    let pix_gateway = config.asaas_api_key.clone().map(|key| {
        Arc::new(AsaasClient::new(
            http.clone(),
            config.asaas_api_url.clone(),
            key,
        )) as Arc<dyn PixTransferGateway>
    });
    if pix_gateway.is_none() {
        warn!("ASAAS_API_KEY is not set; partner withdrawals will be settled manually");
    }

    let storage = match (&config.storage_url, &config.storage_service_key) {
        (Some(url), Some(key)) => Some(Arc::new(HttpObjectStorage::new(
            http.clone(),
            url.as_str(),
            config.storage_bucket.clone(),
            key.clone(),
        )) as Arc<dyn ObjectStorage>),
        _ => {
            warn!("STORAGE_URL or STORAGE_SERVICE_KEY is not set; asset uploads are disabled");
            None
        }
    };

    let webhook_sender =
        Arc::new(HttpProductWebhookSender::new(http)) as Arc<dyn ProductWebhookSender>;

    let signature_verifier = SignatureVerifier::new(
        config.stripe_webhook_secret.clone(),
        config.asaas_webhook_token.clone(),
    );

    let billing_use_cases = BillingUseCases::new(subscription_repo.clone(), product_repo.clone());
    let notifier = ProductNotifier::new(
        product_repo.clone(),
        subscription_repo.clone(),
        webhook_sender,
    );
    let permission_use_cases = PermissionUseCases::new(
        subscription_repo.clone(),
        company_repo.clone(),
        partner_repo.clone(),
        membership_repo.clone(),
    );
    let cross_token_use_cases = CrossTokenUseCases::new(
        membership_repo.clone(),
        subscription_repo,
        product_repo,
        company_repo.clone(),
        profile_repo.clone(),
        config.cross_token_secret.clone(),
    );
    let company_use_cases = CompanyUseCases::new(company_repo);
    let contact_use_cases = ContactUseCases::new(contact_repo, membership_repo);
    let partner_use_cases = PartnerUseCases::new(partner_repo, profile_repo, pix_gateway);
    let asset_use_cases = AssetUseCases::new(storage);

    Ok(AppState {
        config: Arc::new(config),
        signature_verifier: Arc::new(signature_verifier),
        billing_use_cases: Arc::new(billing_use_cases),
        notifier: Arc::new(notifier),
        permission_use_cases: Arc::new(permission_use_cases),
        cross_token_use_cases: Arc::new(cross_token_use_cases),
        company_use_cases: Arc::new(company_use_cases),
        contact_use_cases: Arc::new(contact_use_cases),
        partner_use_cases: Arc::new(partner_use_cases),
        asset_use_cases: Arc::new(asset_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sincla_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs); skipped when the file cannot be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
