//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - Mocks for the outbound ports (webhooks, PIX, object storage)
//! - `TestAppStateBuilder` for HTTP-level tests and hub token helpers

mod account_mocks;
mod app_state_builder;
mod billing_mocks;
mod factories;
mod port_mocks;

pub use account_mocks::*;
pub use app_state_builder::*;
pub use billing_mocks::*;
pub use factories::*;
pub use port_mocks::*;

use jsonwebtoken::{EncodingKey, Header, encode};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::application::jwt::{HUB_TOKEN_AUDIENCE, HubClaims};

pub const TEST_HUB_SECRET: &str = "test-hub-jwt-secret";
pub const TEST_CROSS_TOKEN_SECRET: &str = "test-cross-token-secret-0123456789abcdef";
pub const TEST_STRIPE_SECRET: &str = "whsec_test_bridge_secret";
pub const TEST_ASAAS_TOKEN: &str = "asaas_test_access_token";

/// Hub session token for `user_id`, valid for an hour.
pub fn hub_token(user_id: Uuid) -> String {
    hub_token_with(user_id, HUB_TOKEN_AUDIENCE, Duration::hours(1))
}

/// Hub session token with a chosen audience and lifetime. A negative `ttl`
/// yields an already expired token.
pub fn hub_token_with(user_id: Uuid, aud: &str, ttl: Duration) -> String {
    let now = OffsetDateTime::now_utc();
    let claims = HubClaims {
        sub: user_id.to_string(),
        email: Some("ana@example.com".to_string()),
        aud: aud.to_string(),
        iat: now.unix_timestamp(),
        exp: (now + ttl).unix_timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_HUB_SECRET.as_bytes()),
    )
    .unwrap()
}
