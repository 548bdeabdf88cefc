//! Store module
//!
//! Persistence of clients and credit records (PostgreSQL) and the
//! short-lived profile cache (Redis), each behind a trait with an
//! in-memory implementation for tests.

mod error;
pub mod memory;
mod postgres;
mod redis_cache;

use async_trait::async_trait;
use std::time::Duration;

pub use error::StoreError;
pub use memory::{InMemoryClientStore, InMemoryProfileCache};
pub use postgres::PgClientStore;
pub use redis_cache::RedisProfileCache;

use crate::domain::{Client, ClientProfile, CreditRecord, NewCredit};

/// Persistence of clients and credit records
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Persist a client first seen through the gateway.
    ///
    /// Fails with `StoreError::DuplicateClient` if the external id is
    /// already persisted.
    async fn insert_client(&self, profile: &ClientProfile) -> Result<Client, StoreError>;

    async fn find_client_by_orzu_id(&self, orzu_id: i64) -> Result<Option<Client>, StoreError>;

    async fn insert_credit(&self, credit: &NewCredit) -> Result<CreditRecord, StoreError>;

    /// Link a credit record to its gateway transaction. Succeeds at most once per record.
    async fn update_credit_transaction_id(
        &self,
        credit_id: i64,
        transaction_id: i64,
    ) -> Result<(), StoreError>;

    async fn find_credit(&self, credit_id: i64) -> Result<Option<CreditRecord>, StoreError>;
}

/// Key-value cache with expiry
#[async_trait]
pub trait ProfileCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;
}
