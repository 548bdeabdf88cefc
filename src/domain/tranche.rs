//! Tranche requests and results
//!
//! The inbound request, its enriched form forwarded to the gateway, and the
//! integrity hash that proves the caller holds the shared secret.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::amount::TrancheSum;
use super::error::DomainError;

/// Inbound request to create a credit tranche
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheRequest {
    pub terminal_id: i64,
    #[serde(rename = "pOrzuId")]
    pub orzu_id: i64,
    #[serde(rename = "pInn", default)]
    pub inn: String,
    pub pan: String,
    /// Raw number as sent; checked by `validate`
    #[serde(rename = "pSum")]
    pub sum: f64,
    /// Ignored upstream: the configured service id is always forwarded
    #[serde(rename = "pServiceId", default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(rename = "pCredConditions")]
    pub condition_id: i64,
    #[serde(rename = "pRecipient")]
    pub recipient: String,
}

impl TrancheRequest {
    /// Check field-level rules before anything is stored or sent,
    /// returning the validated sum
    pub fn validate(&self) -> Result<TrancheSum, DomainError> {
        let sum = TrancheSum::try_from(self.sum)?;
        if self.orzu_id <= 0 {
            return Err(DomainError::invalid_identifier("pOrzuId", self.orzu_id.to_string()));
        }
        if self.terminal_id <= 0 {
            return Err(DomainError::invalid_identifier(
                "terminal_id",
                self.terminal_id.to_string(),
            ));
        }
        if self.condition_id <= 0 {
            return Err(DomainError::invalid_identifier(
                "pCredConditions",
                self.condition_id.to_string(),
            ));
        }
        if !(12..=19).contains(&self.pan.len()) || !self.pan.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidTranche(
                "pan must be 12 to 19 digits".to_string(),
            ));
        }
        if self.recipient.trim().is_empty() {
            return Err(DomainError::EmptyIdentifier("pRecipient"));
        }
        Ok(sum)
    }

    /// Attach the validated sum, caller credentials and the integrity hash
    pub fn enrich(
        &self,
        sum: TrancheSum,
        credentials: &TrancheCredentials,
    ) -> GatewayTrancheRequest {
        GatewayTrancheRequest {
            terminal_id: self.terminal_id,
            orzu_id: self.orzu_id,
            inn: self.inn.clone(),
            pan: self.pan.clone(),
            sum,
            service_id: credentials.service_id.clone(),
            token: credentials.token.clone(),
            condition_id: self.condition_id,
            recipient: self.recipient.clone(),
            hash: integrity_hash(
                &credentials.secret_key,
                self.orzu_id,
                &credentials.service_id,
                &credentials.token,
            ),
            phone_uuid: credentials.phone_uuid.clone(),
        }
    }
}

/// Caller credentials attached to every tranche sent upstream
#[derive(Debug, Clone)]
pub struct TrancheCredentials {
    pub secret_key: String,
    pub service_id: String,
    pub token: String,
    pub phone_uuid: Option<String>,
}

/// Tranche request as the gateway expects it (`POST /orzupay/pay`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayTrancheRequest {
    pub terminal_id: i64,
    #[serde(rename = "pOrzuId")]
    pub orzu_id: i64,
    #[serde(rename = "pInn")]
    pub inn: String,
    pub pan: String,
    #[serde(rename = "pSum")]
    pub sum: TrancheSum,
    #[serde(rename = "pServiceId")]
    pub service_id: String,
    #[serde(rename = "pToken")]
    pub token: String,
    #[serde(rename = "pCredConditions")]
    pub condition_id: i64,
    #[serde(rename = "pRecipient")]
    pub recipient: String,
    pub hash: String,
    #[serde(rename = "pPhoneUUID", skip_serializing_if = "Option::is_none")]
    pub phone_uuid: Option<String>,
}

/// Successful gateway answer to a tranche request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrancheResult {
    pub code: i64,
    pub message: String,
    /// Gateway transaction id
    #[serde(rename = "payload")]
    pub transaction_id: i64,
}

/// Hex SHA-256 of `secret ‖ orzu_id ‖ service_id ‖ token`
pub fn integrity_hash(secret: &str, orzu_id: i64, service_id: &str, token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(orzu_id.to_string().as_bytes());
    hasher.update(service_id.as_bytes());
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
