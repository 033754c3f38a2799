//! # Money Module
//!
//! Provides the `Money` type used for stock unit costs and valuation.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  Stock valuation multiplies a unit cost by thousands of units, so      │
//! │  float drift shows up in the dashboard total.                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    cost_per_unit = 150.00  →  stored as 15000                           │
//! │    value of 45 units       →  15000 × 45 = 675000  →  "6750.00"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Serialized as a decimal string with two places (`"150.00"`), the way a
//! `DECIMAL(10,2)` column reads back. Accepted from clients either as a
//! JSON number (`150`, `35.5`) or as a string (`"35.50"`).
//!
//! ## Usage
//! ```rust
//! use stockmaster_core::money::Money;
//!
//! let cost = Money::from_cents(15000);
//! assert_eq!(cost.to_string(), "150.00");
//!
//! let value = cost.checked_multiply_quantity(45).unwrap();
//! assert_eq!(value.cents(), 675000);
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: valuation of negative on-hand cells stays representable
/// - **Single field tuple struct**: zero-cost over the INTEGER column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount, rounding to the nearest
    /// cent.
    ///
    /// ## Returns
    /// * `None` - the amount is NaN, infinite or out of range
    ///
    /// ## Example
    /// ```rust
    /// use stockmaster_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(35.5), Some(Money::from_cents(3550)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Returns
    /// * `None` - the product does not fit in an `i64` of cents
    ///
    /// ## Example
    /// ```rust
    /// use stockmaster_core::money::Money;
    ///
    /// let unit_cost = Money::from_cents(3500);
    /// assert_eq!(unit_cost.checked_multiply_quantity(12), Some(Money::from_cents(42000)));
    /// assert_eq!(unit_cost.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, `None` as soon as the running total overflows.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }

    /// Formats the amount as a plain decimal with two places (`"-5.50"`).
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a decimal number", trimmed),
        };

        let amount: f64 = trimmed.parse().map_err(|_| invalid())?;
        Money::from_decimal(amount).ok_or_else(invalid)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Money::from_decimal(n)
                .ok_or_else(|| de::Error::custom("amount is not a finite number")),
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(15000).to_decimal_string(), "150.00");
        assert_eq!(Money::from_cents(3550).to_decimal_string(), "35.50");
        assert_eq!(Money::from_cents(7).to_decimal_string(), "0.07");
        assert_eq!(Money::from_cents(-550).to_decimal_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_from_decimal_rounds_to_cent() {
        assert_eq!(Money::from_decimal(19.99).map(|m| m.cents()), Some(1999));
        assert_eq!(Money::from_decimal(0.125).map(|m| m.cents()), Some(13));
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("320.00".parse::<Money>().unwrap().cents(), 32000);
        assert_eq!(" 45 ".parse::<Money>().unwrap().cents(), 4500);
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_serde_accepts_number_or_string() {
        let from_number: Money = serde_json::from_str("150").unwrap();
        let from_float: Money = serde_json::from_str("35.5").unwrap();
        let from_text: Money = serde_json::from_str("\"450.00\"").unwrap();

        assert_eq!(from_number.cents(), 15000);
        assert_eq!(from_float.cents(), 3550);
        assert_eq!(from_text.cents(), 45000);

        assert!(serde_json::from_str::<Money>("\"twelve\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(4200)).unwrap();
        assert_eq!(json, "\"42.00\"");
    }

    #[test]
    fn test_sum_and_multiply() {
        let total = Money::checked_sum([
            Money::from_cents(15000).checked_multiply_quantity(45).unwrap(),
            Money::from_cents(3500).checked_multiply_quantity(12).unwrap(),
        ])
        .unwrap();
        assert_eq!(total.cents(), 717000);
        assert_eq!(total.to_string(), "7170.00");
    }

    #[test]
    fn test_arithmetic_overflow_is_none() {
        let cost = Money::from_cents(15000);
        assert_eq!(cost.checked_multiply_quantity(100_000_000_000_000_000), None);

        let near_max = Money::from_cents(i64::MAX - 1);
        assert_eq!(near_max.checked_add(Money::from_cents(1)), Some(Money::from_cents(i64::MAX)));
        assert_eq!(Money::checked_sum([near_max, Money::from_cents(2)]), None);
    }
}
