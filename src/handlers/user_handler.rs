//! User Handler
//!
//! Looks a client up by INN and keeps the profile in the cache until the
//! client's first tranche persists it.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ClientProfile, DomainError};
use crate::error::AppError;
use crate::gateway::{ClientLookup, PaymentGateway};
use crate::store::{ProfileCache, StoreError};

/// Handler for client lookup
pub struct LookupUserHandler {
    gateway: Arc<dyn PaymentGateway>,
    cache: Arc<dyn ProfileCache>,
    ttl: Duration,
}

impl LookupUserHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        cache: Arc<dyn ProfileCache>,
        ttl: Duration,
    ) -> Self {
        Self { gateway, cache, ttl }
    }

    /// Execute the lookup; a cache write failure fails the lookup
    pub async fn execute(&self, inn: &str) -> Result<ClientLookup, AppError> {
        let inn = inn.trim();
        if inn.is_empty() {
            return Err(DomainError::EmptyIdentifier("inn").into());
        }

        let lookup = self.gateway.client_by_inn(inn).await?;
        let profile = &lookup.payload;

        let bytes = serde_json::to_vec(profile).map_err(StoreError::from)?;
        self.cache
            .set(&ClientProfile::cache_key(profile.orzu_id), &bytes, self.ttl)
            .await?;

        tracing::info!(orzu_id = profile.orzu_id, "Client profile cached");

        Ok(lookup)
    }
}
