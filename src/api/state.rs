//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, OtpConfig};
use crate::domain::TrancheCredentials;
use crate::gateway::PaymentGateway;
use crate::session::SessionTokens;
use crate::store::{ClientStore, ProfileCache};

/// Collaborators and settings handed to every request
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub store: Arc<dyn ClientStore>,
    pub cache: Arc<dyn ProfileCache>,
    pub sessions: SessionTokens,
    pub service_token: Arc<str>,
    pub credentials: TrancheCredentials,
    pub otp: OtpConfig,
    pub profile_cache_ttl: Duration,
}

impl AppState {
    pub fn new(
        config: &Config,
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn ClientStore>,
        cache: Arc<dyn ProfileCache>,
    ) -> Self {
        Self {
            gateway,
            store,
            cache,
            sessions: SessionTokens::from_config(&config.session),
            service_token: Arc::from(config.service_token.as_str()),
            credentials: config.orzu.tranche_credentials(),
            otp: config.otp.clone(),
            profile_cache_ttl: config.profile_cache_ttl,
        }
    }
}
