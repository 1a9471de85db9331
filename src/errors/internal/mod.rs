use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod credential;
pub mod database;

pub use credential::CredentialError;
pub use database::DatabaseError;

/// Internal error type for store and service operations
///
/// Not exposed via API - endpoints convert to `ApiError`, which decides what the
/// client gets to see.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    /// Wrap a database error, classifying constraint violations
    ///
    /// Unique-index violations become `Conflict` and foreign-key violations become
    /// `Validation`; everything else stays an infrastructure error.
    pub fn database(operation: &str, source: DbErr) -> InternalError {
        match source.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                InternalError::Conflict(format!("{} violates a unique constraint: {}", operation, detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                InternalError::Validation("Referenced record does not exist".to_string())
            }
            _ => InternalError::Database(DatabaseError::Operation {
                operation: operation.to_string(),
                source,
            }),
        }
    }

    pub fn validation(message: impl Into<String>) -> InternalError {
        InternalError::Validation(message.into())
    }

    pub fn not_found(entity: &str, id: &str) -> InternalError {
        InternalError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> InternalError {
        InternalError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> InternalError {
        InternalError::Conflict(message.into())
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
