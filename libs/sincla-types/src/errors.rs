use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error codes returned by hub endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCredentials,
    Forbidden,
    InvalidInput,
    Conflict,
    NotFound,
    DatabaseError,
    UpstreamError,
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Cross-token verification errors.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    #[error("JWT library error: {0}")]
    Library(#[from] jsonwebtoken::errors::Error),
}

impl JwtError {
    /// True when the token could not even be parsed, as opposed to failing verification.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }
}
