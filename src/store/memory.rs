//! In-memory store and cache.
//!
//! Same contracts as the PostgreSQL and Redis implementations, plus
//! counters and failure switches for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{ClientStore, ProfileCache, StoreError};
use crate::domain::{Client, ClientProfile, CreditRecord, NewCredit};

#[derive(Debug, Default)]
struct Tables {
    clients: HashMap<i64, Client>,
    credits: HashMap<i64, CreditRecord>,
}

/// In-memory `ClientStore`
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    tables: RwLock<Tables>,
    next_id: AtomicI64,
    client_inserts: AtomicUsize,
    fail_credit_insert: AtomicBool,
    fail_credit_update: AtomicBool,
    lose_next_client_race: AtomicBool,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a persisted client
    pub async fn with_client(self, profile: &ClientProfile) -> Self {
        let id = self.allocate_id();
        self.tables
            .write()
            .await
            .clients
            .insert(profile.orzu_id, Client::from_profile(id, profile));
        self
    }

    /// Fail every credit insert
    pub fn failing_credit_inserts(self) -> Self {
        self.fail_credit_insert.store(true, Ordering::SeqCst);
        self
    }

    /// Fail every transaction id update
    pub fn failing_credit_updates(self) -> Self {
        self.fail_credit_update.store(true, Ordering::SeqCst);
        self
    }

    /// On the next client insert, behave as if a concurrent request
    /// persisted the same client first
    pub fn losing_next_client_race(self) -> Self {
        self.lose_next_client_race.store(true, Ordering::SeqCst);
        self
    }

    /// Successful client inserts
    pub fn client_inserts(&self) -> usize {
        self.client_inserts.load(Ordering::SeqCst)
    }

    pub async fn clients(&self) -> Vec<Client> {
        self.tables.read().await.clients.values().cloned().collect()
    }

    /// Credit records ordered by id
    pub async fn credits(&self) -> Vec<CreditRecord> {
        let mut credits: Vec<_> = self.tables.read().await.credits.values().cloned().collect();
        credits.sort_by_key(|c| c.id);
        credits
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn insert_client(&self, profile: &ClientProfile) -> Result<Client, StoreError> {
        let mut tables = self.tables.write().await;

        if self.lose_next_client_race.swap(false, Ordering::SeqCst) {
            let id = self.allocate_id();
            tables
                .clients
                .insert(profile.orzu_id, Client::from_profile(id, profile));
        }

        if tables.clients.contains_key(&profile.orzu_id) {
            return Err(StoreError::DuplicateClient(profile.orzu_id));
        }

        let client = Client::from_profile(self.allocate_id(), profile);
        tables.clients.insert(profile.orzu_id, client.clone());
        self.client_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(client)
    }

    async fn find_client_by_orzu_id(&self, orzu_id: i64) -> Result<Option<Client>, StoreError> {
        Ok(self.tables.read().await.clients.get(&orzu_id).cloned())
    }

    async fn insert_credit(&self, credit: &NewCredit) -> Result<CreditRecord, StoreError> {
        if self.fail_credit_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("credit insert refused".to_string()));
        }

        let record = CreditRecord::from_new(self.allocate_id(), credit);
        self.tables
            .write()
            .await
            .credits
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_credit_transaction_id(
        &self,
        credit_id: i64,
        transaction_id: i64,
    ) -> Result<(), StoreError> {
        if self.fail_credit_update.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("credit update refused".to_string()));
        }

        let mut tables = self.tables.write().await;
        let record = tables
            .credits
            .get_mut(&credit_id)
            .ok_or(StoreError::CreditNotFound(credit_id))?;

        if record.transaction_id.is_some() {
            return Err(StoreError::AlreadyLinked(credit_id));
        }
        record.transaction_id = Some(transaction_id);
        Ok(())
    }

    async fn find_credit(&self, credit_id: i64) -> Result<Option<CreditRecord>, StoreError> {
        Ok(self.tables.read().await.credits.get(&credit_id).cloned())
    }
}

/// In-memory `ProfileCache` honouring expiry
#[derive(Debug, Default)]
pub struct InMemoryProfileCache {
    entries: RwLock<HashMap<String, (Vec<u8>, Instant)>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls made
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls made
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileCache for InMemoryProfileCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), Instant::now() + ttl));
        Ok(())
    }
}
