//! Gateway Errors
//!
//! Error types for calls to the Orzu and OTP services.

/// Errors that can occur talking to the gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network failure, timeout, or undecodable body
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Success HTTP status but non-success code in the response envelope
    #[error("Gateway rejected request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// Response does not have the expected shape
    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Check if the gateway could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        match self {
            GatewayError::Request(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::InvalidResponse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::status(503, "maintenance");
        assert_eq!(err.to_string(), "Unexpected HTTP status 503: maintenance");
        assert!(!err.is_unreachable());

        let err = GatewayError::rejected(400, "condition not allowed");
        assert!(err.to_string().contains("condition not allowed"));
    }
}
