use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{app_error::AppResult, domain::entities::partner::PixKeyType};

/// Transfer request handed to the payment gateway.
#[derive(Debug, Clone, Serialize)]
pub struct PixTransferRequest {
    pub amount: f64,
    pub pix_key: String,
    pub pix_key_type: PixKeyType,
    pub description: String,
    /// Our withdrawal id, echoed back by the gateway for reconciliation
    pub external_reference: String,
}

/// Gateway acknowledgement of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PixTransferReceipt {
    pub id: String,
    pub status: String,
}

#[async_trait]
pub trait PixTransferGateway: Send + Sync {
    async fn transfer(&self, request: &PixTransferRequest) -> AppResult<PixTransferReceipt>;
}
