//! The outcome of a rate lookup.

use bookstore_common::Currency;
use rust_decimal::Decimal;

use crate::error::FxError;

/// Exchange rate from USD to `currency`, in units of `currency` per 1 USD.
///
/// The rate is positive in both variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeRate {
    /// Fetched from the rate source during this call.
    Live { rate: Decimal, currency: Currency },
    /// The configured default, substituted because the lookup failed.
    Fallback {
        rate: Decimal,
        currency: Currency,
        reason: FxError,
    },
}

impl ExchangeRate {
    /// Build a live rate, rejecting non-positive values.
    pub fn live(rate: Decimal, currency: Currency) -> Result<Self, FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency,
                rate: rate.to_string(),
            });
        }
        Ok(ExchangeRate::Live { rate, currency })
    }

    pub fn rate(&self) -> Decimal {
        match self {
            ExchangeRate::Live { rate, .. } | ExchangeRate::Fallback { rate, .. } => *rate,
        }
    }

    pub fn currency(&self) -> &Currency {
        match self {
            ExchangeRate::Live { currency, .. } | ExchangeRate::Fallback { currency, .. } => {
                currency
            }
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ExchangeRate::Live { .. })
    }

    /// Why the fallback was used, if it was.
    pub fn fallback_reason(&self) -> Option<&FxError> {
        match self {
            ExchangeRate::Live { .. } => None,
            ExchangeRate::Fallback { reason, .. } => Some(reason),
        }
    }
}
