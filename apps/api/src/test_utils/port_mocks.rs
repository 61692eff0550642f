//! Mocks for the object storage and PIX transfer ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        object_storage::ObjectStorage,
        pix_transfer::{PixTransferGateway, PixTransferReceipt, PixTransferRequest},
    },
};

pub const TEST_STORAGE_PUBLIC_BASE: &str = "https://storage.test/public/assets";

/// path -> (content type, bytes)
#[derive(Default)]
pub struct InMemoryObjectStorage {
    pub objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl InMemoryObjectStorage {
    pub fn get(&self, path: &str) -> Option<(String, Vec<u8>)> {
        self.objects.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> AppResult<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{TEST_STORAGE_PUBLIC_BASE}/{path}")
    }
}

/// Accepts every transfer.
pub struct OkPixGateway;

#[async_trait]
impl PixTransferGateway for OkPixGateway {
    async fn transfer(&self, request: &PixTransferRequest) -> AppResult<PixTransferReceipt> {
        Ok(PixTransferReceipt {
            id: format!("tra_{}", request.external_reference),
            status: "PENDING".to_string(),
        })
    }
}

/// Rejects every transfer the way a gateway outage would.
pub struct FailingPixGateway;

#[async_trait]
impl PixTransferGateway for FailingPixGateway {
    async fn transfer(&self, _request: &PixTransferRequest) -> AppResult<PixTransferReceipt> {
        Err(AppError::Upstream("asaas returned 503".into()))
    }
}
