//! Session tokens
//!
//! A session token is issued once an OTP is confirmed and is required on
//! the business routes. Tokens are HS256 JWTs carrying only `iat` and
//! `exp`, sent as `Bearer <jwt>`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SessionConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// Session token errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session token is missing")]
    Missing,

    #[error("Session token must use the Bearer scheme")]
    MissingPrefix,

    #[error("Session token has expired")]
    Expired,

    #[error("Session token is invalid")]
    Invalid,

    #[error("Failed to issue session token: {0}")]
    Issue(String),
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.jwt_secret, config.ttl)
    }

    /// Issue a token valid for the configured TTL
    pub fn issue(&self) -> Result<String, SessionError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Issue(e.to_string()))
    }

    /// Verify a `Bearer <jwt>` header value
    pub fn check(&self, header: &str) -> Result<Claims, SessionError> {
        if header.is_empty() {
            return Err(SessionError::Missing);
        }

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(SessionError::MissingPrefix)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> SessionTokens {
        SessionTokens::new("test-secret", Duration::from_secs(3000))
    }

    #[test]
    fn test_issued_token_passes_check() {
        let tokens = tokens();
        let jwt = tokens.issue().unwrap();

        let claims = tokens.check(&format!("Bearer {}", jwt)).unwrap();
        assert_eq!(claims.exp - claims.iat, 3000);
    }

    #[test]
    fn test_missing_and_unprefixed() {
        let tokens = tokens();
        let jwt = tokens.issue().unwrap();

        assert!(matches!(tokens.check(""), Err(SessionError::Missing)));
        assert!(matches!(tokens.check(&jwt), Err(SessionError::MissingPrefix)));
        assert!(matches!(
            tokens.check(&format!("Token {}", jwt)),
            Err(SessionError::MissingPrefix)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = SessionTokens::new("other-secret", Duration::from_secs(60))
            .issue()
            .unwrap();

        assert!(matches!(
            tokens().check(&format!("Bearer {}", jwt)),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_expired_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iat: now - 120,
            exp: now - 60,
        };
        let jwt = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            tokens().check(&format!("Bearer {}", jwt)),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            tokens().check("Bearer not.a.jwt"),
            Err(SessionError::Invalid)
        ));
    }
}
