use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Coarse entitlement tier a user holds within a product.
///
/// `Admin` is only ever granted implicitly to company owners when a
/// cross-token is issued; it is never stored in the access table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccessLevel {
    Advanced,
    Basic,
    Admin,
}

/// Which rule of the permission chain granted access.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GrantedBy {
    Owner,
    Partner,
    Member,
}

impl GrantedBy {
    /// Ownership and partnership change rarely, so grants from them may be cached briefly.
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Owner | Self::Partner)
    }
}
