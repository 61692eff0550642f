use serde::{Deserialize, Serialize};

use crate::AccessLevel;

/// Claims carried by a cross-token.
///
/// Issued by the hub and verified by satellite products.
/// Lets a hub-authenticated user act inside a product without a separate login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// User's email address
    pub email: String,

    /// User's display name
    pub name: String,

    /// Company the user is acting for
    pub company: CompanyClaims,

    /// Role of the user inside the company (e.g., "owner", "admin", "member")
    pub role: String,

    /// Access tier inside the target product
    pub access_level: AccessLevel,

    /// Product the token is scoped to (UUID as string)
    pub product_id: String,

    /// Machine-readable plan identifier (e.g., "pro")
    pub plan_code: String,

    /// Branding snapshot so the product can theme itself without calling back
    pub branding: BrandingClaims,

    /// Token issued at (Unix timestamp)
    pub iat: i64,

    /// Token expiration (Unix timestamp)
    pub exp: i64,

    /// Issuer, always "sincla-hub"
    pub iss: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyClaims {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub cnpj: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingClaims {
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub description: Option<String>,
}
