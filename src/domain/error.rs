//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::amount::AmountError;

/// Validation failures and domain invariant violations.
///
/// Everything here is raised before (or instead of) any call to the
/// gateway or the stores, except `ClientNotResolved`, which is the
/// inconsistency between the persistence store and the profile cache.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Phone is neither nine local digits nor `+` and twelve digits
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// Identifier that must be numeric is not
    #[error("Invalid {field}: {value:?} is not a number")]
    InvalidIdentifier { field: &'static str, value: String },

    /// Required identifier is empty
    #[error("Empty identifier: {0}")]
    EmptyIdentifier(&'static str),

    /// Tranche sum is out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Tranche request field fails validation
    #[error("Invalid tranche request: {0}")]
    InvalidTranche(String),

    /// Client is neither persisted nor cached
    #[error("Client resolution failed: orzu_id {orzu_id} is neither stored nor cached")]
    ClientNotResolved { orzu_id: i64 },
}

impl DomainError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            field,
            value: value.into(),
        }
    }

    /// Check if this is a client error (caller's fault, nothing was sent upstream)
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, Self::ClientNotResolved { .. })
    }
}

impl From<AmountError> for DomainError {
    fn from(e: AmountError) -> Self {
        DomainError::InvalidAmount(e.to_string())
    }
}
