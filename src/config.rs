//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::domain::TrancheCredentials;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Redis connection URL
    pub redis_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Value callers must send in the `Authorization` header
    pub service_token: String,

    /// Session token signing and lifetime
    pub session: SessionConfig,

    /// How long a looked-up client profile stays in the cache
    pub profile_cache_ttl: Duration,

    /// Orzu lending service
    pub orzu: OrzuConfig,

    /// OTP service
    pub otp: OtpConfig,

    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
}

/// Orzu lending service parameters
#[derive(Debug, Clone)]
pub struct OrzuConfig {
    pub url: String,
    /// Static token sent in the `token` header
    pub token: String,
    /// Terminal token used for catalogue lookups
    pub terminal_token: String,
    /// Shared secret for the tranche integrity hash
    pub secret_key: String,
    pub service_id: String,
    pub phone_uuid: Option<String>,
}

impl OrzuConfig {
    /// Credentials attached to outbound tranches
    pub fn tranche_credentials(&self) -> TrancheCredentials {
        TrancheCredentials {
            secret_key: self.secret_key.clone(),
            service_id: self.service_id.clone(),
            token: self.token.clone(),
            phone_uuid: self.phone_uuid.clone(),
        }
    }
}

/// OTP service parameters
#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub url: String,
    /// OTP lifetime in seconds
    pub lifetime: i64,
    /// Confirmation attempts allowed
    pub confirm_limit: i64,
}

/// Session token parameters
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parsed("DATABASE_MAX_CONNECTIONS", "10")?;
        let redis_url = required("REDIS_URL")?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("PORT", "3000")?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let service_token = required("SERVICE_TOKEN")?;

        let session = SessionConfig {
            jwt_secret: required("JWT_SECRET")?,
            ttl: Duration::from_secs(parsed("SESSION_TTL_SECS", "3000")?),
        };

        let profile_cache_ttl = Duration::from_secs(parsed("PROFILE_CACHE_TTL_SECS", "3000")?);

        let orzu = OrzuConfig {
            url: required("ORZU_URL")?,
            token: required("ORZU_TOKEN")?,
            terminal_token: required("ORZU_TERMINAL_TOKEN")?,
            secret_key: required("ORZU_SECRET_KEY")?,
            service_id: required("ORZU_SERVICE_ID")?,
            phone_uuid: env::var("ORZU_PHONE_UUID").ok().filter(|v| !v.is_empty()),
        };

        let otp = OtpConfig {
            url: required("OTP_URL")?,
            lifetime: parsed("OTP_LIFETIME", "120")?,
            confirm_limit: parsed("OTP_CONFIRM_LIMIT", "3")?,
        };

        let http_timeout = Duration::from_secs(parsed("HTTP_TIMEOUT_SECS", "30")?);

        Ok(Self {
            database_url,
            database_max_connections,
            redis_url,
            host,
            port,
            environment,
            service_token,
            session,
            profile_cache_ttl,
            orzu,
            otp,
            http_timeout,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
