use thiserror::Error;

use models::errors::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("id mismatch: path id {path} does not match body id {body}")]
    IdMismatch { path: i32, body: i32 },
    #[error("product {0} not found")]
    NotFound(i32),
    #[error("Insufficient stock available.")]
    InsufficientStock,
    #[error("concurrency conflict: {0}")]
    Concurrency(String),
    #[error("id generation failed: {0}")]
    IdGeneration(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn db(e: impl std::fmt::Display) -> Self { Self::Db(e.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::IdMismatch { .. } => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::InsufficientStock => 1004,
            ServiceError::Concurrency(_) => 1101,
            ServiceError::IdGeneration(_) => 1102,
            ServiceError::Db(_) => 1200,
        }
    }

    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::IdMismatch { .. }
                | ServiceError::NotFound(_)
                | ServiceError::InsufficientStock
        )
    }
}
