//! Document store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Appwrite API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document {id}: {reason}")]
    InvalidDocument { id: String, reason: String },
}

impl StoreError {
    pub fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::InvalidDocument {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
