//! API Middleware
//!
//! Service token and session token authentication, and request logging.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use uuid::Uuid;

use crate::domain::OperationContext;
use crate::session::SessionError;

use super::AppState;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Header carrying the session JWT
pub const SESSION_HEADER: &str = "token";

fn unauthorized(error: &str, error_code: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": error,
            "error_code": error_code
        })),
    )
        .into_response()
}

fn correlation_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

// =========================================================================
// Service Token Authentication Middleware
// =========================================================================

/// Require the `Authorization` header to equal the configured service token
pub async fn service_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let provided = match headers.get("Authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(unauthorized(
                "Missing Authorization header",
                "missing_service_token",
            ));
        }
    };

    if provided != &*state.service_token {
        tracing::warn!("Rejected request with invalid service token");
        return Err(unauthorized("Invalid service token", "invalid_service_token"));
    }

    let mut context = OperationContext::new();
    if let Some(id) = correlation_id(&headers) {
        context = context.with_correlation_id(id);
    }
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        context = context.with_client_ip(addr.ip());
    }
    context.ensure_correlation_id();

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// Session Token Authentication Middleware
// =========================================================================

/// Require a valid `Bearer` session token in the `token` header
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let header = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if let Err(e) = state.sessions.check(header) {
        let code = match e {
            SessionError::Missing => "missing_session",
            SessionError::Expired => "session_expired",
            _ => "invalid_session",
        };
        return Err(unauthorized(&e.to_string(), code));
    }

    let context = request
        .extensions()
        .get::<OperationContext>()
        .cloned()
        .unwrap_or_default()
        .with_session();
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "token", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware.
///
/// Assigns a correlation id when the caller did not send one, so the
/// auth layers and handlers log under the same id.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let correlation_id = correlation_id(request.headers()).unwrap_or_else(Uuid::new_v4);
    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        request.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    let headers = mask_headers_for_logging(request.headers());
    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        correlation_id = %correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        correlation_id = %correlation_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "service-secret".parse().unwrap());
        headers.insert("token", "Bearer abc.def.ghi".parse().unwrap());
        headers.insert("x-correlation-id", "c0ffee".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let find = |key: &str| masked.iter().find(|(k, _)| k == key).unwrap().1.clone();
        assert_eq!(find("authorization"), "[REDACTED]");
        assert_eq!(find("token"), "[REDACTED]");
        assert_eq!(find("content-type"), "application/json");
        assert_eq!(find("x-correlation-id"), "c0ffee");
    }

    #[test]
    fn test_correlation_id_parsing() {
        let mut headers = HeaderMap::new();
        assert!(correlation_id(&headers).is_none());

        let id = Uuid::new_v4();
        headers.insert(CORRELATION_ID_HEADER, id.to_string().parse().unwrap());
        assert_eq!(correlation_id(&headers), Some(id));

        headers.insert(CORRELATION_ID_HEADER, "not-a-uuid".parse().unwrap());
        assert!(correlation_id(&headers).is_none());
    }
}
