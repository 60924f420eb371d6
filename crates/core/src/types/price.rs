//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so line totals and subtotals never pick
//! up binary floating point drift. On the wire they are plain JSON numbers
//! (`59.9`, `10`), which is the format the device storage already holds.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// A total exceeds the representable decimal range.
    #[error("price total out of range")]
    Overflow,
}

/// A unit price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a non-negative price such as `"59.90"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` if the input is not a decimal number and
    /// `PriceError::Negative` if it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units at this price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total is out of range.
    pub fn times(self, quantity: u32) -> Result<Self, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self)
            .ok_or(PriceError::Overflow)
    }

    /// Sum of `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the sum is out of range.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(PriceError::Overflow)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

// Stored carts hold prices as JSON numbers, not strings.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(D::Error::custom(PriceError::Negative));
        }
        Ok(Self(amount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("59.90").unwrap(), Price::from_cents(5990));
        assert_eq!(Price::parse(" 10 ").unwrap(), Price::from_cents(1000));
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse(""), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-1.00"), Err(PriceError::Negative));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(5990).to_string(), "$59.90");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
        assert_eq!(Price::parse("10").unwrap().to_string(), "$10.00");
    }

    #[test]
    fn test_times_and_add() {
        let shirt = Price::from_cents(5990);
        assert_eq!(shirt.times(2).unwrap(), Price::from_cents(11980));
        assert_eq!(shirt.times(0).unwrap(), Price::ZERO);

        let total = Price::from_cents(100)
            .checked_add(Price::from_cents(250))
            .unwrap();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge.times(2), Err(PriceError::Overflow));
        assert_eq!(huge.checked_add(Price::from_cents(1)), Err(PriceError::Overflow));
        assert_eq!(huge.times(1).unwrap(), huge);
    }

    #[test]
    fn test_rejects_negative_json() {
        let err = serde_json::from_str::<Price>("-5").unwrap_err();
        assert!(err.to_string().contains("price cannot be negative"));
        assert_eq!(serde_json::from_str::<Price>("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_deserializes_json_numbers() {
        let float: Price = serde_json::from_str("59.9").unwrap();
        assert_eq!(float, Price::from_cents(5990));

        let integer: Price = serde_json::from_str("10").unwrap();
        assert_eq!(integer, Price::from_cents(1000));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(5990)).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(59.9));
    }
}
