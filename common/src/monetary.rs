//! Monetary helpers: currency codes and cent rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BookstoreError;

/// Prices are stored and reported with two decimal places.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round a monetary value to cents, halves away from zero.
///
/// `0.125` becomes `0.13`. `Decimal::round_dp` would give `0.12`
/// (banker's rounding), which is not what prices use.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Currency code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code without validation.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Create a currency, rejecting anything that is not 2-3 ASCII letters.
    pub fn parse(code: &str) -> Result<Self, BookstoreError> {
        let currency = Self::new(code);
        if !currency.is_valid() {
            return Err(BookstoreError::Validation {
                field: "currency".to_string(),
                message: format!("'{}' is not a 2-3 letter currency code", code),
            });
        }
        Ok(currency)
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Check the code shape.
    pub fn is_valid(&self) -> bool {
        (2..=3).contains(&self.0.len()) && self.0.chars().all(|c| c.is_ascii_alphabetic())
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl FromStr for Currency {
    type Err = BookstoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up_midpoint() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
        assert_eq!(round_half_up(dec!(0.135)), dec!(0.14));
        assert_eq!(round_half_up(dec!(12.345)), dec!(12.35));
        assert_eq!(round_half_up(dec!(0.124999)), dec!(0.12));
    }

    #[test]
    fn test_round_half_up_keeps_scale() {
        assert_eq!(round_half_up(dec!(17.5)).to_string(), "17.5");
        assert_eq!(round_half_up(dec!(17.500)).to_string(), "17.50");
    }

    #[test]
    fn test_currency_normalizes_case() {
        assert_eq!(Currency::new(" eur "), Currency::new("EUR"));
        assert_eq!(Currency::new("cop").code(), "COP");
    }

    #[test]
    fn test_currency_parse() {
        assert!(Currency::parse("EU").is_ok());
        assert!(Currency::parse("mxn").is_ok());
        assert!(Currency::parse("EURO").is_err());
        assert!(Currency::parse("E").is_err());
        assert!(Currency::parse("U5D").is_err());
        assert!("".parse::<Currency>().is_err());
    }
}
