//! Command and query definitions
//!
//! Inputs that arrive as loose strings are parsed here, before any handler
//! talks to the gateway.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

fn parse_id(field: &'static str, value: &str) -> Result<i64, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::invalid_identifier(field, value))
}

// =========================================================================
// ListConditionsQuery
// =========================================================================

/// Query for the lending conditions of a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConditionsQuery {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub orzu_id: String,
}

impl ListConditionsQuery {
    pub fn new(service_id: impl Into<String>, orzu_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            orzu_id: orzu_id.into(),
        }
    }

    /// Both identifiers as integers
    pub fn parse(&self) -> Result<(i64, i64), DomainError> {
        Ok((
            parse_id("service_id", &self.service_id)?,
            parse_id("orzu_id", &self.orzu_id)?,
        ))
    }
}

// =========================================================================
// PrecheckCardQuery
// =========================================================================

/// Query to check whether a card can receive a tranche
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecheckCardQuery {
    #[serde(default)]
    pub orzu_id: String,
    #[serde(default)]
    pub pan: String,
}

impl PrecheckCardQuery {
    pub fn new(orzu_id: impl Into<String>, pan: impl Into<String>) -> Self {
        Self {
            orzu_id: orzu_id.into(),
            pan: pan.into(),
        }
    }

    pub fn parse(&self) -> Result<(i64, &str), DomainError> {
        let orzu_id = parse_id("orzu_id", &self.orzu_id)?;
        let pan = self.pan.trim();
        if pan.is_empty() {
            return Err(DomainError::EmptyIdentifier("pan"));
        }
        Ok((orzu_id, pan))
    }
}

// =========================================================================
// Results
// =========================================================================

/// Session issued after a confirmed OTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIssued {
    pub token: String,
}

/// Outcome of a card pre-check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCheckResult {
    pub orzu_id: i64,
    pub eligible: bool,
}
