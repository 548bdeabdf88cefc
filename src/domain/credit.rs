//! Credit records
//!
//! One record per tranche request. It is written before the gateway is
//! called and linked to the gateway's transaction id afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::TrancheSum;
use super::client::Client;
use super::tranche::TrancheRequest;

/// Credit record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    Created,
    Confirmed,
    Completed,
}

impl CreditStatus {
    /// Numeric code stored in `orzu_credits.status_id`
    pub fn code(self) -> i16 {
        match self {
            CreditStatus::Created => 1,
            CreditStatus::Confirmed => 2,
            CreditStatus::Completed => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(CreditStatus::Created),
            2 => Some(CreditStatus::Confirmed),
            3 => Some(CreditStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditStatus::Created => write!(f, "created"),
            CreditStatus::Confirmed => write!(f, "confirmed"),
            CreditStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Credit record built from a request, before its client is known
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCredit {
    pub terminal_id: i64,
    pub sum: TrancheSum,
    pub recipient: String,
    pub condition_id: i64,
    pub status: CreditStatus,
}

impl PendingCredit {
    pub fn from_request(request: &TrancheRequest, sum: TrancheSum) -> Self {
        Self {
            terminal_id: request.terminal_id,
            sum,
            recipient: request.recipient.clone(),
            condition_id: request.condition_id,
            status: CreditStatus::Created,
        }
    }

    /// Bind the record to its owning client
    pub fn for_client(self, client: &Client) -> NewCredit {
        NewCredit {
            terminal_id: self.terminal_id,
            sum: self.sum,
            recipient: self.recipient,
            condition_id: self.condition_id,
            status: self.status,
            client_id: client.id,
        }
    }
}

/// Credit record ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewCredit {
    pub terminal_id: i64,
    pub sum: TrancheSum,
    pub recipient: String,
    pub condition_id: i64,
    pub status: CreditStatus,
    pub client_id: i64,
}

/// Persisted credit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    pub id: i64,
    pub terminal_id: i64,
    pub sum: Decimal,
    pub recipient: String,
    pub condition_id: i64,
    pub status: CreditStatus,
    /// Gateway transaction id, absent until the tranche succeeded upstream
    pub transaction_id: Option<i64>,
    pub client_id: i64,
}

impl CreditRecord {
    pub fn from_new(id: i64, credit: &NewCredit) -> Self {
        Self {
            id,
            terminal_id: credit.terminal_id,
            sum: credit.sum.value(),
            recipient: credit.recipient.clone(),
            condition_id: credit.condition_id,
            status: credit.status,
            transaction_id: None,
            client_id: credit.client_id,
        }
    }

    /// Created locally but never linked to a gateway transaction
    pub fn is_unlinked(&self) -> bool {
        self.transaction_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        for status in [
            CreditStatus::Created,
            CreditStatus::Confirmed,
            CreditStatus::Completed,
        ] {
            assert_eq!(CreditStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(CreditStatus::Created.code(), 1);
        assert_eq!(CreditStatus::from_code(9), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CreditStatus::Created.to_string(), "created");
        assert_eq!(CreditStatus::Completed.to_string(), "completed");
    }
}
