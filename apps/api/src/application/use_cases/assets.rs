use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::{
    app_error::{AppError, AppResult},
    application::{ports::object_storage::ObjectStorage, validators::is_valid_asset_path},
};

pub const MAX_ASSET_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/gif",
    "image/svg+xml",
    "image/x-icon",
    "image/vnd.microsoft.icon",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedAsset {
    pub url: String,
    pub path: String,
}

/// Content type implied by a file extension, for clients that send none.
fn content_type_from_path(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AssetUseCases {
    storage: Option<Arc<dyn ObjectStorage>>,
}

impl AssetUseCases {
    pub fn new(storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self { storage }
    }

    pub async fn upload(
        &self,
        path: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedAsset> {
        if !is_valid_asset_path(path) {
            return Err(AppError::InvalidInput("Invalid asset path".into()));
        }
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("File is empty".into()));
        }
        if bytes.len() > MAX_ASSET_BYTES {
            return Err(AppError::InvalidInput("File exceeds 5 MiB".into()));
        }

        let content_type = content_type
            .filter(|ct| *ct != "application/octet-stream")
            .or_else(|| content_type_from_path(path))
            .filter(|ct| ALLOWED_CONTENT_TYPES.contains(ct))
            .ok_or_else(|| AppError::InvalidInput("Unsupported file type".into()))?;

        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| AppError::Internal("Object storage is not configured".into()))?;

        let size = bytes.len();
        storage.put(path, content_type, bytes).await?;
        info!(path, content_type, size, "Asset uploaded");

        Ok(UploadedAsset {
            url: storage.public_url(path),
            path: path.to_string(),
        })
    }
}
