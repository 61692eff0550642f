use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Payment gateway a subscription or billing event originates from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gateway {
    Stripe,
    Asaas,
    Manual,
}
