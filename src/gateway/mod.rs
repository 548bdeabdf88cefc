//! Gateway module
//!
//! Outbound calls to the Orzu lending service and the OTP service.

mod client;
mod error;
pub mod fake;
pub mod models;

use async_trait::async_trait;

pub use client::OrzuGateway;
pub use error::GatewayError;
pub use fake::FakeGateway;
pub use models::{ClientLookup, Condition, Envelope, Otp, PingStatus, Service};

use crate::domain::{GatewayTrancheRequest, TrancheResult};

/// Operations the gateway exposes.
///
/// Every failure, including a non-success code in an otherwise valid
/// response, is an `Err`; callers never inspect codes themselves.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn ping(&self) -> Result<PingStatus, GatewayError>;

    /// Look a client up by INN
    async fn client_by_inn(&self, inn: &str) -> Result<ClientLookup, GatewayError>;

    async fn send_otp(&self, otp: &Otp) -> Result<Otp, GatewayError>;

    async fn confirm_otp(&self, otp: &Otp) -> Result<(), GatewayError>;

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError>;

    async fn list_conditions(
        &self,
        service_id: i64,
        orzu_id: i64,
    ) -> Result<Vec<Condition>, GatewayError>;

    async fn create_tranche(
        &self,
        request: &GatewayTrancheRequest,
    ) -> Result<TrancheResult, GatewayError>;

    async fn precheck_card(&self, orzu_id: i64, pan: &str) -> Result<(), GatewayError>;
}
