//! Phone number normalization
//!
//! The OTP service expects international Tajik numbers. A bare nine-digit
//! local number gets the `+992` country prefix.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DomainError;

/// Country prefix for local numbers
pub const COUNTRY_PREFIX: &str = "+992";

static LOCAL_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{9}$").expect("Invalid local phone regex"));

static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{12}$").expect("Invalid international phone regex"));

/// Return the phone in `+` and twelve digits form, or reject it
pub fn normalize_phone(phone: &str) -> Result<String, DomainError> {
    if LOCAL_PHONE_REGEX.is_match(phone) {
        return Ok(format!("{}{}", COUNTRY_PREFIX, phone));
    }
    if INTERNATIONAL_PHONE_REGEX.is_match(phone) {
        return Ok(phone.to_string());
    }
    Err(DomainError::InvalidPhone(phone.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_number_gets_prefix() {
        assert_eq!(normalize_phone("915501234").unwrap(), "+992915501234");
    }

    #[test]
    fn test_international_number_unchanged() {
        assert_eq!(normalize_phone("+992915501234").unwrap(), "+992915501234");
    }

    #[test]
    fn test_short_number_rejected() {
        assert_eq!(
            normalize_phone("12345"),
            Err(DomainError::InvalidPhone("12345".to_string()))
        );
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        for phone in ["", "992915501234", "+99291550123", "91550123a", " 915501234"] {
            assert!(normalize_phone(phone).is_err(), "accepted {:?}", phone);
        }
    }
}
