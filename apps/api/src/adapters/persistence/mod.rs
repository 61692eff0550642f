use std::str::FromStr;

use sqlx::PgPool;

use crate::app_error::AppError;

pub mod company;
pub mod contact;
pub mod membership;
pub mod partner;
pub mod product;
pub mod subscription;
pub mod user_profile;

/// Parse a text column into an enum, logging a warning on unknown values.
///
/// Columns are plain `text` in the shared schema, so values written by other
/// services may fall outside what this service knows.
pub fn parse_text_column<T: FromStr>(
    raw: &str,
    field_name: &str,
    entity_type: &str,
    entity_id: &str,
) -> Option<T> {
    match T::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                field = field_name,
                entity_type = entity_type,
                entity_id = entity_id,
                raw_value = %raw,
                "Unknown value in text column"
            );
            None
        }
    }
}

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("A record with this value already exists".into())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::InvalidInput("Referenced record not found".into())
            }
            _ => {
                // Log the actual error for debugging, but don't expose details
                tracing::error!(error = ?err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
