//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::gateway::GatewayError;
use crate::session::SessionError;
use crate::store::StoreError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid service token")]
    InvalidServiceToken,

    #[error(transparent)]
    Session(#[from] SessionError),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Upstream errors (5xx)
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(GatewayError),

    // Server errors (5xx)
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Malformed or mistyped JSON bodies are validation failures
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),

            // 401 Unauthorized
            AppError::InvalidServiceToken => (StatusCode::UNAUTHORIZED, "invalid_service_token"),
            AppError::Session(SessionError::Issue(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "session_issue_failed")
            }
            AppError::Session(SessionError::Expired) => {
                (StatusCode::UNAUTHORIZED, "session_expired")
            }
            AppError::Session(_) => (StatusCode::UNAUTHORIZED, "invalid_session"),

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => {
                use crate::domain::DomainError;
                match domain_err {
                    DomainError::InvalidPhone(_) => (StatusCode::BAD_REQUEST, "invalid_phone"),
                    DomainError::InvalidIdentifier { .. } => {
                        (StatusCode::BAD_REQUEST, "invalid_identifier")
                    }
                    DomainError::EmptyIdentifier(_) => {
                        (StatusCode::BAD_REQUEST, "empty_identifier")
                    }
                    DomainError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
                    DomainError::InvalidTranche(_) => (StatusCode::BAD_REQUEST, "invalid_tranche"),
                    DomainError::ClientNotResolved { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "client_not_resolved")
                    }
                }
            }

            // 502 / 503
            AppError::Gateway(_) => (StatusCode::BAD_GATEWAY, "gateway_error"),
            AppError::GatewayUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "gateway_unavailable")
            }

            // 500 Internal Server Error
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let details = match &self {
            AppError::InvalidRequest(msg) => Some(msg.clone()),
            AppError::Domain(e) => Some(e.to_string()),
            AppError::Gateway(e) | AppError::GatewayUnavailable(e) => {
                tracing::warn!("Gateway error: {}", e);
                Some(e.to_string())
            }
            AppError::Store(e) => {
                tracing::error!("Storage error: {:?}", e);
                None
            }
            AppError::Session(SessionError::Issue(msg)) => {
                tracing::error!("Session issue error: {}", msg);
                None
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                None
            }
            AppError::InvalidServiceToken | AppError::Session(_) => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_validation_errors_are_bad_request() {
        let err = AppError::from(DomainError::InvalidPhone("12345".to_string()));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);

        let err = AppError::from(DomainError::invalid_identifier("service_id", "x"));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "invalid_identifier"));
    }

    #[test]
    fn test_invalid_amount_is_bad_request() {
        let err = AppError::from(DomainError::InvalidAmount("Sum must be positive".to_string()));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "invalid_amount"));

        let err = AppError::InvalidRequest("missing field `pan`".to_string());
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "invalid_request"));
    }

    #[test]
    fn test_client_not_resolved_is_unprocessable() {
        let err = AppError::from(DomainError::ClientNotResolved { orzu_id: 4242 });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "client_not_resolved")
        );
    }

    #[test]
    fn test_upstream_and_storage_mapping() {
        let err = AppError::from(GatewayError::rejected(500, "boom"));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_GATEWAY);

        let err = AppError::GatewayUnavailable(GatewayError::status(503, ""));
        assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);

        let err = AppError::from(StoreError::CreditNotFound(1));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_session_errors_are_unauthorized() {
        let err = AppError::from(SessionError::MissingPrefix);
        assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);

        let err = AppError::from(SessionError::Issue("key".to_string()));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
