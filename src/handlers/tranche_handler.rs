//! Tranche Handler
//!
//! Creates a credit tranche: resolves the client (store first, then the
//! profile cache), writes the credit record, calls the gateway and links
//! the gateway's transaction id back to the record.

use std::sync::Arc;

use crate::domain::{
    Client, ClientProfile, DomainError, OperationContext, PendingCredit, TrancheCredentials,
    TrancheRequest, TrancheResult,
};
use crate::error::AppError;
use crate::gateway::PaymentGateway;
use crate::store::{ClientStore, ProfileCache, StoreError};

// =========================================================================
// CreateTrancheHandler
// =========================================================================

/// Handler for credit tranche creation
pub struct CreateTrancheHandler {
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn ClientStore>,
    cache: Arc<dyn ProfileCache>,
    credentials: TrancheCredentials,
}

impl CreateTrancheHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn ClientStore>,
        cache: Arc<dyn ProfileCache>,
        credentials: TrancheCredentials,
    ) -> Self {
        Self {
            gateway,
            store,
            cache,
            credentials,
        }
    }

    /// Execute the tranche request.
    ///
    /// A gateway failure leaves the credit record `Created` with no
    /// transaction id. A failure to link a successful transaction is
    /// returned as a storage error; the upstream transaction stays.
    pub async fn execute(
        &self,
        request: TrancheRequest,
        context: &OperationContext,
    ) -> Result<TrancheResult, AppError> {
        let sum = request.validate()?;

        let pending = PendingCredit::from_request(&request, sum);

        let mut client = self.resolve_client(request.orzu_id).await?;
        client.attach_pan(request.pan.as_str());

        let credit = self
            .store
            .insert_credit(&pending.for_client(&client))
            .await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            credit_id = credit.id,
            client_id = client.id,
            orzu_id = client.orzu_id,
            "Credit record created"
        );

        let outbound = request.enrich(sum, &self.credentials);
        let result = match self.gateway.create_tranche(&outbound).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    correlation_id = ?context.correlation_id,
                    credit_id = credit.id,
                    unreachable = e.is_unreachable(),
                    error = %e,
                    "Gateway rejected tranche; credit record left unlinked"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .store
            .update_credit_transaction_id(credit.id, result.transaction_id)
            .await
        {
            tracing::error!(
                correlation_id = ?context.correlation_id,
                credit_id = credit.id,
                transaction_id = result.transaction_id,
                error = %e,
                "Tranche created upstream but not linked to its credit record"
            );
            return Err(e.into());
        }

        tracing::info!(
            correlation_id = ?context.correlation_id,
            credit_id = credit.id,
            transaction_id = result.transaction_id,
            "Tranche created"
        );

        Ok(result)
    }

    /// Find the persisted client, or persist it from the cached profile
    async fn resolve_client(&self, orzu_id: i64) -> Result<Client, AppError> {
        if let Some(client) = self.store.find_client_by_orzu_id(orzu_id).await? {
            return Ok(client);
        }

        let cached = self
            .cache
            .get(&ClientProfile::cache_key(orzu_id))
            .await?
            .ok_or(DomainError::ClientNotResolved { orzu_id })?;

        let profile: ClientProfile =
            serde_json::from_slice(&cached).map_err(StoreError::from)?;

        match self.store.insert_client(&profile).await {
            Ok(client) => {
                tracing::info!(client_id = client.id, orzu_id, "Client persisted from cache");
                Ok(client)
            }
            Err(e) if e.is_duplicate_client() => {
                tracing::debug!(orzu_id, "Client persisted concurrently; reloading");
                self.store
                    .find_client_by_orzu_id(orzu_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "client {} reported duplicate but not found",
                            orzu_id
                        ))
                    })
            }
            Err(e) => Err(e.into()),
        }
    }
}
