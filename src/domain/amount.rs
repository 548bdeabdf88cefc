//! Tranche sum
//!
//! Domain primitive for the disbursed sum of a tranche.
//! All sums are validated at construction time, so a request carrying an
//! invalid sum never reaches the stores or the gateway.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum sum of a single tranche
const MAX_SUM: i64 = 1_000_000_000;

/// Maximum decimal places (diram)
const MAX_SCALE: u32 = 2;

/// TrancheSum is a validated positive monetary value.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum 2 decimal places
/// - Maximum value is 1 000 000 000
///
/// On the wire it is a JSON number, the way the gateway expects `pSum`.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use orzu_gateway::domain::TrancheSum;
///
/// let sum = TrancheSum::new(Decimal::new(150050, 2)).unwrap();
/// assert_eq!(sum.value(), Decimal::new(150050, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TrancheSum(Decimal);

/// Errors that can occur when creating a TrancheSum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Sum must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Sum has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Sum exceeds maximum allowed value ({MAX_SUM})")]
    Overflow,

    #[error("Invalid sum format: {0}")]
    ParseError(String),
}

impl TrancheSum {
    /// Create a new TrancheSum with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if value > 1 000 000 000
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        if value > Decimal::from(MAX_SUM) {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for TrancheSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for TrancheSum {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| AmountError::ParseError(e.to_string()))?;
        TrancheSum::new(decimal)
    }
}

impl TryFrom<f64> for TrancheSum {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // Shortest round-trip text keeps 1500.5 as 1500.5 rather than its binary expansion
        TrancheSum::from_str(&value.to_string())
    }
}

impl From<TrancheSum> for f64 {
    fn from(sum: TrancheSum) -> Self {
        sum.0.to_f64().unwrap_or_default()
    }
}
