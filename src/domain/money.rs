//! Exact monetary amounts and order quantities.
//!
//! Amounts are whole currency units held in an `i64`. All arithmetic is
//! checked integer arithmetic; binary floating point never touches money.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::SalesError;

/// A non-negative amount of money in whole currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] if `units` is negative.
    pub fn new(units: i64) -> Result<Self, SalesError> {
        if units < 0 {
            return Err(SalesError::Validation(format!(
                "amount must not be negative: {units}"
            )));
        }
        Ok(Self(units))
    }

    /// Returns the raw number of currency units.
    #[must_use]
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Parses a price from a JSON value: a whole number or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] for fractional, negative, or
    /// non-numeric input.
    pub fn from_json(field: &str, value: &serde_json::Value) -> Result<Self, SalesError> {
        let units = match value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            SalesError::Validation(format!("{field} must be a whole number of currency units"))
        })?;
        Self::new(units)
            .map_err(|_| SalesError::Validation(format!("{field} must not be negative")))
    }

    /// `self × quantity`, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: Quantity) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity.get())).map(Self)
    }

    /// `self + other`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positive order quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Creates a quantity, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] if `n` is zero.
    pub fn new(n: u32) -> Result<Self, SalesError> {
        if n == 0 {
            return Err(SalesError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }
        Ok(Self(n))
    }

    /// Returns the inner count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Coerces client input into a quantity.
    ///
    /// Accepts a JSON integer or an integer string (surrounding whitespace
    /// ignored). Zero, negatives, fractions, booleans and other text are
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SalesError::Validation`] when the value is not a positive
    /// integer.
    pub fn coerce(value: &serde_json::Value) -> Result<Self, SalesError> {
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let n = parsed
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                SalesError::Validation("quantity must be a positive integer".to_string())
            })?;
        Self::new(n)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let n = u32::deserialize(deserializer)?;
        Self::new(n).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
