//! Scriptable in-process gateway.
//!
//! Answers from configured data and records what it was sent, so workflow
//! and router tests can run without the Orzu or OTP services.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::models::{ClientLookup, Condition, Envelope, Otp, PingStatus, Service, SUCCESS_CODE};
use super::{GatewayError, PaymentGateway};
use crate::domain::{ClientProfile, GatewayTrancheRequest, TrancheResult};

#[derive(Debug, Default)]
struct Script {
    profiles: HashMap<String, ClientProfile>,
    services: Vec<Service>,
    conditions: Vec<Condition>,
    tranche_rejection: Option<(i64, String)>,
    otp_rejected: bool,
    card_rejected: bool,
}

#[derive(Debug, Default)]
struct Recorded {
    tranches: Vec<GatewayTrancheRequest>,
    sent_otps: Vec<Otp>,
    confirmed_otps: Vec<Otp>,
}

/// Fake `PaymentGateway`
#[derive(Debug)]
pub struct FakeGateway {
    script: Mutex<Script>,
    recorded: Mutex<Recorded>,
    next_transaction_id: AtomicI64,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeGateway {
    /// Gateway that accepts everything; transaction ids start at 1000
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script::default()),
            recorded: Mutex::new(Recorded::default()),
            next_transaction_id: AtomicI64::new(1000),
        }
    }

    /// Answer INN lookups for `inn` with `profile`
    pub fn with_profile(self, inn: &str, profile: ClientProfile) -> Self {
        lock(&self.script).profiles.insert(inn.to_string(), profile);
        self
    }

    pub fn with_services(self, services: Vec<Service>) -> Self {
        lock(&self.script).services = services;
        self
    }

    pub fn with_conditions(self, conditions: Vec<Condition>) -> Self {
        lock(&self.script).conditions = conditions;
        self
    }

    /// Next successful tranche gets this transaction id
    pub fn with_transaction_id(self, transaction_id: i64) -> Self {
        self.next_transaction_id
            .store(transaction_id, Ordering::SeqCst);
        self
    }

    /// Reject every tranche with the given envelope code and message
    pub fn rejecting_tranches(self, code: i64, message: &str) -> Self {
        lock(&self.script).tranche_rejection = Some((code, message.to_string()));
        self
    }

    /// Fail every OTP confirmation
    pub fn rejecting_otp(self) -> Self {
        lock(&self.script).otp_rejected = true;
        self
    }

    /// Fail every card pre-check
    pub fn rejecting_cards(self) -> Self {
        lock(&self.script).card_rejected = true;
        self
    }

    /// Tranche requests received, in order
    pub fn tranche_requests(&self) -> Vec<GatewayTrancheRequest> {
        lock(&self.recorded).tranches.clone()
    }

    /// OTPs sent, in order
    pub fn sent_otps(&self) -> Vec<Otp> {
        lock(&self.recorded).sent_otps.clone()
    }

    /// OTPs confirmed, in order
    pub fn confirmed_otps(&self) -> Vec<Otp> {
        lock(&self.recorded).confirmed_otps.clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn ping(&self) -> Result<PingStatus, GatewayError> {
        Ok(PingStatus {
            code: SUCCESS_CODE,
            message: "pong".to_string(),
        })
    }

    async fn client_by_inn(&self, inn: &str) -> Result<ClientLookup, GatewayError> {
        let profile = lock(&self.script).profiles.get(inn).cloned();
        match profile {
            Some(payload) => Ok(Envelope {
                code: SUCCESS_CODE,
                message: "OK".to_string(),
                payload,
            }),
            None => Err(GatewayError::rejected(404, "client not found")),
        }
    }

    async fn send_otp(&self, otp: &Otp) -> Result<Otp, GatewayError> {
        let mut echoed = otp.clone();
        let mut recorded = lock(&self.recorded);
        echoed.id = format!("otp-{}", recorded.sent_otps.len() + 1);
        recorded.sent_otps.push(otp.clone());
        Ok(echoed)
    }

    async fn confirm_otp(&self, otp: &Otp) -> Result<(), GatewayError> {
        if lock(&self.script).otp_rejected {
            return Err(GatewayError::status(400, "400 Bad Request"));
        }
        lock(&self.recorded).confirmed_otps.push(otp.clone());
        Ok(())
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        Ok(lock(&self.script).services.clone())
    }

    async fn list_conditions(
        &self,
        _service_id: i64,
        _orzu_id: i64,
    ) -> Result<Vec<Condition>, GatewayError> {
        Ok(lock(&self.script).conditions.clone())
    }

    async fn create_tranche(
        &self,
        request: &GatewayTrancheRequest,
    ) -> Result<TrancheResult, GatewayError> {
        lock(&self.recorded).tranches.push(request.clone());

        if let Some((code, message)) = lock(&self.script).tranche_rejection.clone() {
            return Err(GatewayError::rejected(code, message));
        }

        Ok(TrancheResult {
            code: SUCCESS_CODE,
            message: "OK".to_string(),
            transaction_id: self.next_transaction_id.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn precheck_card(&self, _orzu_id: i64, _pan: &str) -> Result<(), GatewayError> {
        if lock(&self.script).card_rejected {
            return Err(GatewayError::status(400, "card is not eligible"));
        }
        Ok(())
    }
}
