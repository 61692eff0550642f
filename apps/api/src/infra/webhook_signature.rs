//! Authentication of inbound billing webhooks.
//!
//! Stripe-style callers sign `"{t}.{body}"` with HMAC-SHA256 and send
//! `stripe-signature: t=<unix>,v1=<hex>[,v1=<hex>...]`. Asaas sends a static
//! shared token in `asaas-access-token`. Anything else is an internal caller.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use crate::domain::entities::gateway::Gateway;

type HmacSha256 = Hmac<Sha256>;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";
pub const ASAAS_TOKEN_HEADER: &str = "asaas-access-token";

/// Maximum distance between a signature timestamp and now.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureRejection {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("Signature mismatch")]
    Mismatch,

    #[error("Signature timestamp outside tolerance")]
    Stale,

    #[error("Invalid Asaas access token")]
    AsaasTokenMismatch,

    #[error("Asaas webhook token is not configured")]
    AsaasNotConfigured,
}

/// `t=<timestamp>,v1=<hex hmac>` over `"{timestamp}.{body}"`.
pub fn sign_payload(secret: &str, timestamp: i64, body: &str) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        hmac_hex(secret, timestamp, body).unwrap_or_default()
    )
}

// HMAC-SHA256 accepts keys of any length; None is unreachable in practice.
fn hmac_hex(secret: &str, timestamp: i64, body: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{timestamp}.{body}").as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Checks a Stripe-style signature header against `body` at time `now`.
pub fn verify_stripe_signature(
    body: &str,
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), SignatureRejection> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureRejection::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureRejection::MalformedHeader);
    }

    let expected = hmac_hex(secret, timestamp, body).ok_or(SignatureRejection::Mismatch)?;
    if !signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected))
    {
        return Err(SignatureRejection::Mismatch);
    }
    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureRejection::Stale);
    }
    Ok(())
}

/// Decides which gateway sent a webhook and whether to trust it.
pub struct SignatureVerifier {
    stripe_secret: Option<SecretString>,
    asaas_token: Option<SecretString>,
}

impl SignatureVerifier {
    pub fn new(stripe_secret: Option<SecretString>, asaas_token: Option<SecretString>) -> Self {
        if stripe_secret.is_none() {
            warn!(
                "STRIPE_WEBHOOK_SECRET is not set; Stripe-signed billing webhooks are accepted without verification"
            );
        }
        if asaas_token.is_none() {
            warn!("ASAAS_WEBHOOK_TOKEN is not set; Asaas billing webhooks will be rejected");
        }
        Self {
            stripe_secret,
            asaas_token,
        }
    }

    pub fn verify(
        &self,
        body: &str,
        stripe_signature: Option<&str>,
        asaas_token: Option<&str>,
        now: i64,
    ) -> Result<Gateway, SignatureRejection> {
        if let Some(header) = stripe_signature {
            if let Some(secret) = &self.stripe_secret {
                verify_stripe_signature(body, header, secret.expose_secret(), now)?;
            }
            return Ok(Gateway::Stripe);
        }

        if let Some(token) = asaas_token {
            let expected = self
                .asaas_token
                .as_ref()
                .ok_or(SignatureRejection::AsaasNotConfigured)?;
            if !constant_time_compare(token, expected.expose_secret()) {
                return Err(SignatureRejection::AsaasTokenMismatch);
            }
            return Ok(Gateway::Asaas);
        }

        Ok(Gateway::Manual)
    }
}
