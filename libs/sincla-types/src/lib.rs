//! Shared types and cross-token primitives for the Sincla hub.
//!
//! This crate provides:
//! - Cross-token claims (`CrossTokenClaims`, `CompanyClaims`, `BrandingClaims`)
//! - Access tiers and grant sources
//! - Response shapes of the hub's check endpoints
//! - HS256 cross-token signing and verification

mod access;
mod claims;
mod crypto;
mod errors;
mod responses;

pub use access::{AccessLevel, GrantedBy};
pub use claims::{BrandingClaims, CompanyClaims, CrossTokenClaims};
pub use crypto::{CROSS_TOKEN_ISSUER, CROSS_TOKEN_TTL_SECS, sign_cross_token, verify_cross_token};
pub use errors::{ErrorCode, JwtError};
pub use responses::{
    PermissionResponse, SubscriptionCheck, SubscriptionSummary, ValidateCrossTokenResponse,
};
