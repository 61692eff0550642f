use sincla_types::{ErrorCode, JwtError};
use thiserror::Error;

/// SDK-specific errors.
#[derive(Debug, Error)]
pub enum SinclaError {
    /// Token is missing or unusable before verification
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Cross-token verification failed
    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    /// Token was issued for another product
    #[error("Product mismatch: expected {expected}, got {actual}")]
    ProductMismatch { expected: String, actual: String },

    /// Hub returned an error
    #[error("API error: {code} - {message}")]
    ApiError { code: ErrorCode, message: String },

    /// Network error (only with `client` feature)
    #[cfg(feature = "client")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
