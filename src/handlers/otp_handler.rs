//! OTP Handlers
//!
//! Sends one-time passwords and exchanges a confirmed one for a session
//! token.

use std::sync::Arc;

use crate::config::OtpConfig;
use crate::domain::normalize_phone;
use crate::error::AppError;
use crate::gateway::{Otp, PaymentGateway};
use crate::session::SessionTokens;

use super::SessionIssued;

// =========================================================================
// SendOtpHandler
// =========================================================================

pub struct SendOtpHandler {
    gateway: Arc<dyn PaymentGateway>,
    settings: OtpConfig,
}

impl SendOtpHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, settings: OtpConfig) -> Self {
        Self { gateway, settings }
    }

    /// Normalize the phone, apply configured limits, and send
    pub async fn execute(&self, mut otp: Otp) -> Result<Otp, AppError> {
        otp.account = normalize_phone(&otp.account)?;
        otp.lifetime = self.settings.lifetime;
        otp.confirm_limit = self.settings.confirm_limit;

        let sent = self.gateway.send_otp(&otp).await?;
        tracing::info!(otp_id = %sent.id, "OTP sent");
        Ok(sent)
    }
}

// =========================================================================
// ConfirmOtpHandler
// =========================================================================

pub struct ConfirmOtpHandler {
    gateway: Arc<dyn PaymentGateway>,
    sessions: SessionTokens,
}

impl ConfirmOtpHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, sessions: SessionTokens) -> Self {
        Self { gateway, sessions }
    }

    pub async fn execute(&self, otp: Otp) -> Result<SessionIssued, AppError> {
        self.gateway.confirm_otp(&otp).await?;

        let token = self.sessions.issue()?;
        tracing::info!(otp_id = %otp.id, "OTP confirmed, session issued");
        Ok(SessionIssued { token })
    }
}
