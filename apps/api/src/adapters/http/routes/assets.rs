//! Branding asset uploads (logos, favicons) into public object storage.

use super::common::*;
use crate::application::use_cases::assets::{MAX_ASSET_BYTES, UploadedAsset};
use axum::extract::{DefaultBodyLimit, Multipart};

/// Room for multipart framing and the `path` field on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-asset", post(upload_asset))
        .layer(DefaultBodyLimit::max(MAX_ASSET_BYTES + MULTIPART_OVERHEAD))
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::InvalidInput(format!("Multipart error: {e}"))
}

/// POST /upload-asset
///
/// Multipart form with a `file` part and a `path` text field.
async fn upload_asset(
    State(app_state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadedAsset>> {
    let mut file: Option<(Option<String>, Vec<u8>)> = None;
    let mut path: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((content_type, bytes.to_vec()));
            }
            Some("path") => {
                path = Some(field.text().await.map_err(multipart_error)?.trim().to_string());
            }
            _ => {}
        }
    }

    let (content_type, bytes) =
        file.ok_or_else(|| AppError::InvalidInput("file is required".into()))?;
    let path = path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::InvalidInput("path is required".into()))?;

    info!(user_id = %user.user_id, %path, "Asset upload requested");
    let uploaded = app_state
        .asset_use_cases
        .upload(&path, content_type.as_deref(), bytes)
        .await?;
    Ok(Json(uploaded))
}
