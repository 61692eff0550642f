use std::net::SocketAddr;

use env_helpers::get_env_default;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::infra::error::InfraError;

/// Minimum length of the cross-token signing secret, in bytes.
pub const MIN_CROSS_TOKEN_SECRET_LEN: usize = 32;

pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Applies pending migrations at startup when set.
    pub run_migrations: bool,
    pub bind_addr: SocketAddr,
    /// Verifies hub session bearer tokens.
    pub hub_jwt_secret: SecretString,
    /// Signs cross-tokens. No fallback: the service refuses to start without it.
    pub cross_token_secret: SecretString,
    /// Stripe-style signing secret for the billing bridge. None trusts unsigned Stripe calls.
    pub stripe_webhook_secret: Option<SecretString>,
    /// Token Asaas sends in `asaas-access-token`. None rejects every Asaas call.
    pub asaas_webhook_token: Option<SecretString>,
    /// Asaas API key for PIX transfers. None settles withdrawals manually.
    pub asaas_api_key: Option<SecretString>,
    pub asaas_api_url: Url,
    pub storage_url: Option<Url>,
    pub storage_service_key: Option<SecretString>,
    pub storage_bucket: String,
}

fn required(var: &'static str) -> Result<String, InfraError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(InfraError::ConfigMissing { var })
}

fn optional(var: &'static str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn optional_secret(var: &'static str) -> Option<SecretString> {
    optional(var).map(|v| SecretString::new(v.into()))
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, InfraError> {
    Url::parse(raw).map_err(|e| InfraError::ConfigInvalid {
        var,
        reason: e.to_string(),
    })
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let database_url = required("DATABASE_URL")?;
        let hub_jwt_secret = SecretString::new(required("HUB_JWT_SECRET")?.into());

        let cross_token_secret = SecretString::new(required("CROSS_TOKEN_SECRET")?.into());
        if cross_token_secret.expose_secret().len() < MIN_CROSS_TOKEN_SECRET_LEN {
            return Err(InfraError::ConfigInvalid {
                var: "CROSS_TOKEN_SECRET",
                reason: format!("must be at least {MIN_CROSS_TOKEN_SECRET_LEN} bytes"),
            });
        }

        let bind_addr = optional("BIND_ADDR")
            .map(|raw| {
                raw.parse::<SocketAddr>()
                    .map_err(|e| InfraError::ConfigInvalid {
                        var: "BIND_ADDR",
                        reason: e.to_string(),
                    })
            })
            .transpose()?
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3001)));

        let asaas_api_url = parse_url(
            "ASAAS_API_URL",
            &get_env_default("ASAAS_API_URL", "https://api.asaas.com".to_string()),
        )?;
        let storage_url = optional("STORAGE_URL")
            .map(|raw| parse_url("STORAGE_URL", &raw))
            .transpose()?;

        Ok(Self {
            database_url,
            db_max_connections: get_env_default("DB_MAX_CONNECTIONS", 5),
            run_migrations: get_env_default("RUN_MIGRATIONS", false),
            bind_addr,
            hub_jwt_secret,
            cross_token_secret,
            stripe_webhook_secret: optional_secret("STRIPE_WEBHOOK_SECRET"),
            asaas_webhook_token: optional_secret("ASAAS_WEBHOOK_TOKEN"),
            asaas_api_key: optional_secret("ASAAS_API_KEY"),
            asaas_api_url,
            storage_url,
            storage_service_key: optional_secret("STORAGE_SERVICE_KEY"),
            storage_bucket: get_env_default("STORAGE_BUCKET", "assets".to_string()),
        })
    }
}
