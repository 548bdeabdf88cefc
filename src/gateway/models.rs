//! Gateway wire models
//!
//! Every Orzu response is an envelope `{code, message, payload}`; the
//! payload type depends on the operation, so each operation decodes its
//! own typed envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GatewayError;
use crate::domain::{ClientProfile, TrancheResult};

/// Envelope code meaning success
pub const SUCCESS_CODE: i64 = 200;

/// Typed response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub payload: T,
}

/// Client lookup by INN
pub type ClientLookup = Envelope<ClientProfile>;

/// Envelope before the payload type is known
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    payload: Value,
}

impl RawEnvelope {
    fn parse(body: &str) -> Result<Self, GatewayError> {
        let raw: RawEnvelope = serde_json::from_str(body)?;
        if raw.code != SUCCESS_CODE {
            return Err(GatewayError::rejected(raw.code, raw.message));
        }
        Ok(raw)
    }
}

/// Decode an envelope, rejecting non-success codes before the payload is read
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, GatewayError> {
    let raw = RawEnvelope::parse(body)?;
    Ok(Envelope {
        code: raw.code,
        message: raw.message,
        payload: serde_json::from_value(raw.payload)?,
    })
}

/// Decode the answer to `POST /orzupay/pay`
pub fn decode_tranche_result(body: &str) -> Result<TrancheResult, GatewayError> {
    let raw = RawEnvelope::parse(body)?;
    let transaction_id = transaction_id_from_payload(&raw.payload).ok_or_else(|| {
        GatewayError::InvalidResponse(format!(
            "tranche payload is not a transaction id: {}",
            raw.payload
        ))
    })?;

    Ok(TrancheResult {
        code: raw.code,
        message: raw.message,
        transaction_id,
    })
}

/// The gateway sends the transaction id as a JSON number, sometimes with a
/// fractional part of zero
fn transaction_id_from_payload(payload: &Value) -> Option<i64> {
    match payload {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Answer to `GET /ping`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingStatus {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// One-time password exchanged with the OTP service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Otp {
    #[serde(default)]
    pub id: String,
    pub account: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub lifetime: i64,
    #[serde(rename = "validate_limit", default)]
    pub confirm_limit: i64,
    #[serde(default)]
    pub state: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub expired_at: String,
}

/// Lending service offered by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "externalID", default)]
    pub external_id: String,
}

/// Lending condition a tranche must conform to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub condition_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub min_summa: f64,
    #[serde(default)]
    pub max_summa: f64,
    #[serde(default)]
    pub interval_units: String,
    #[serde(default)]
    pub term: i64,
    #[serde(default)]
    pub cl_comission: f64,
    #[serde(default)]
    pub prc_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_client_lookup() {
        let body = r#"{
            "code": 200,
            "message": "OK",
            "payload": {
                "orzu_id": 9995,
                "client_name": "Aziz",
                "set_date": "2023-01-10",
                "phone_number": "+992915501234",
                "passport_id": "A1234567",
                "passport_issue_date": "2019-05-01"
            }
        }"#;
        let lookup: ClientLookup = decode_envelope(body).unwrap();
        assert_eq!(lookup.payload.orzu_id, 9995);
        assert_eq!(lookup.message, "OK");
    }

    #[test]
    fn test_non_success_code_rejected_before_payload() {
        let body = r#"{"code": 404, "message": "client not found", "payload": null}"#;
        let result: Result<ClientLookup, _> = decode_envelope(body);
        match result {
            Err(GatewayError::Rejected { code, message }) => {
                assert_eq!(code, 404);
                assert_eq!(message, "client not found");
            }
            other => panic!("Expected Rejected, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_tranche_float_payload() {
        let result = decode_tranche_result(r#"{"code": 200, "message": "ok", "payload": 5512.0}"#)
            .unwrap();
        assert_eq!(result.transaction_id, 5512);
    }

    #[test]
    fn test_decode_tranche_integer_payload() {
        let result =
            decode_tranche_result(r#"{"code": 200, "message": "ok", "payload": 77}"#).unwrap();
        assert_eq!(result.transaction_id, 77);
    }

    #[test]
    fn test_decode_tranche_structured_payload_is_invalid() {
        let result =
            decode_tranche_result(r#"{"code": 200, "message": "ok", "payload": {"id": 1}}"#);
        assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
    }

    #[test]
    fn test_decode_tranche_fractional_payload_is_invalid() {
        let result = decode_tranche_result(r#"{"code": 200, "message": "ok", "payload": 1.5}"#);
        assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
    }

    #[test]
    fn test_otp_wire_names() {
        let otp = Otp {
            account: "+992915501234".to_string(),
            lifetime: 120,
            confirm_limit: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&otp).unwrap();
        assert_eq!(json["validate_limit"], 3);
        assert_eq!(json["lifetime"], 120);
    }
}
