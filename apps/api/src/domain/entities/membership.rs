use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Role name that marks the company owner inside `company_members`.
pub const OWNER_ROLE: &str = "owner";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Invited,
    Suspended,
}
