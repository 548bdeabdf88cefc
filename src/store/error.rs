//! Store Errors
//!
//! Error types for the persistence store and the profile cache.

/// Errors that can occur in the stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A client with this external id is already persisted
    #[error("Client with orzu_id {0} already exists")]
    DuplicateClient(i64),

    /// Credit record not found
    #[error("Credit record not found: {0}")]
    CreditNotFound(i64),

    /// Credit record already carries a transaction id
    #[error("Credit record {0} is already linked to a transaction")]
    AlreadyLinked(i64),

    /// Stored data cannot be decoded
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Backend refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Check if this error is a uniqueness conflict on the client's external id
    pub fn is_duplicate_client(&self) -> bool {
        matches!(self, StoreError::DuplicateClient(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}
