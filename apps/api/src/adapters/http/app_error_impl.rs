use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sincla_types::ErrorCode;

use crate::app_error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Database(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Internal server error".into(),
            ),
            AppError::InvalidCredentials => error_resp(
                StatusCode::UNAUTHORIZED,
                ErrorCode::InvalidCredentials,
                "Unauthorized".into(),
            ),
            AppError::Forbidden(msg) => error_resp(StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg),
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, msg)
            }
            AppError::Conflict(msg) => error_resp(StatusCode::CONFLICT, ErrorCode::Conflict, msg),
            AppError::NotFound(msg) => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            AppError::Upstream(_) => error_resp(
                StatusCode::BAD_GATEWAY,
                ErrorCode::UpstreamError,
                "Upstream service failed".into(),
            ),
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Internal server error".into(),
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({ "code": code, "error": message });
    (status, Json(body)).into_response()
}
