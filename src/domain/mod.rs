//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod client;
pub mod context;
pub mod credit;
pub mod error;
pub mod phone;
pub mod tranche;

pub use amount::{AmountError, TrancheSum};
pub use client::{Client, ClientProfile};
pub use context::OperationContext;
pub use credit::{CreditRecord, CreditStatus, NewCredit, PendingCredit};
pub use error::DomainError;
pub use phone::normalize_phone;
pub use tranche::{
    integrity_hash, GatewayTrancheRequest, TrancheCredentials, TrancheRequest, TrancheResult,
};
