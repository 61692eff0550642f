//! Rust SDK for products integrating with the Sincla hub.
//!
//! # Features
//!
//! - **Cross-token verification** - Verify hub-issued tokens locally with the shared secret (no network calls)
//! - **Token extraction** - Extract tokens from Authorization headers or cookies
//! - **Hub API** - Ask the hub for permissions and subscription state (`client` feature)
//!
//! # Example
//!
//! ```rust,ignore
//! use sincla_sdk::{SinclaClient, SinclaConfig};
//!
//! let client = SinclaClient::new(SinclaConfig {
//!     product_id: "6f1c...".to_string(),
//!     shared_secret: std::env::var("CROSS_TOKEN_SECRET")?,
//!     hub_url: Some("https://hub.sincla.com.br".to_string()),
//!     clock_skew_seconds: None,
//! })?;
//!
//! let claims = client.verify_token("eyJ...")?;
//! println!("{} acts for {}", claims.email, claims.company.name);
//! ```

mod client;
mod error;
mod extract;

pub use client::{SinclaClient, SinclaConfig};
pub use error::SinclaError;
pub use extract::{CROSS_TOKEN_COOKIE, Headers};

// Re-export shared types for convenience
pub use sincla_types::{
    AccessLevel, BrandingClaims, CompanyClaims, CrossTokenClaims, GrantedBy, JwtError,
    PermissionResponse, SubscriptionCheck, SubscriptionSummary,
};
