//! Catalog Handler
//!
//! Read-only pass-throughs to the gateway: ping, services, lending
//! conditions and card pre-check.

use std::sync::Arc;

use crate::error::AppError;
use crate::gateway::{Condition, PaymentGateway, PingStatus, Service};

use super::{CardCheckResult, ListConditionsQuery, PrecheckCardQuery};

pub struct CatalogHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl CatalogHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    /// Reachability of the gateway
    pub async fn ping(&self) -> Result<PingStatus, AppError> {
        self.gateway.ping().await.map_err(AppError::GatewayUnavailable)
    }

    pub async fn services(&self) -> Result<Vec<Service>, AppError> {
        Ok(self.gateway.list_services().await?)
    }

    pub async fn conditions(
        &self,
        query: &ListConditionsQuery,
    ) -> Result<Vec<Condition>, AppError> {
        let (service_id, orzu_id) = query.parse()?;
        Ok(self.gateway.list_conditions(service_id, orzu_id).await?)
    }

    pub async fn precheck_card(
        &self,
        query: &PrecheckCardQuery,
    ) -> Result<CardCheckResult, AppError> {
        let (orzu_id, pan) = query.parse()?;
        self.gateway.precheck_card(orzu_id, pan).await?;
        Ok(CardCheckResult {
            orzu_id,
            eligible: true,
        })
    }
}
