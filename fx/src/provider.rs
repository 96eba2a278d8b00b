//! Rate provider trait and the fixed-table provider.

use async_trait::async_trait;
use bookstore_common::Currency;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::config::FallbackRate;
use crate::error::{FxError, FxResult};
use crate::rate::ExchangeRate;

/// Source of USD exchange rates.
///
/// `fetch` cannot fail: every failure mode is absorbed into
/// [`ExchangeRate::Fallback`].
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Rate for USD to `target`, or to the configured default currency
    /// when `target` is `None`.
    async fn fetch(&self, target: Option<&Currency>) -> ExchangeRate;
}

/// Emit the log event for one lookup outcome.
pub(crate) fn record_outcome(provider: &str, requested: &Currency, rate: &ExchangeRate) {
    match rate.fallback_reason() {
        None => info!(
            provider,
            outcome = "live",
            currency = %rate.currency(),
            rate = %rate.rate(),
            "Exchange rate obtained"
        ),
        Some(reason @ FxError::CurrencyNotFound(_)) => warn!(
            provider,
            outcome = reason.outcome(),
            requested = %requested,
            currency = %rate.currency(),
            rate = %rate.rate(),
            "Currency not offered, using default rate"
        ),
        Some(reason) => error!(
            provider,
            outcome = reason.outcome(),
            requested = %requested,
            currency = %rate.currency(),
            rate = %rate.rate(),
            error = %reason,
            "Rate lookup failed, using default rate"
        ),
    }
}

/// Provider answering from an in-process table.
///
/// Useful offline and in tests. Currencies missing from the table get the
/// fallback rate.
pub struct FixedRateProvider {
    rates: DashMap<Currency, Decimal>,
    fallback: FallbackRate,
}

impl FixedRateProvider {
    /// Create a provider with an empty table.
    pub fn new(fallback: FallbackRate) -> Self {
        Self {
            rates: DashMap::new(),
            fallback,
        }
    }

    /// Set the rate for a currency.
    pub fn set_rate(&self, currency: Currency, rate: Decimal) -> FxResult<()> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency,
                rate: rate.to_string(),
            });
        }
        self.rates.insert(currency, rate);
        Ok(())
    }

    /// Drop the rate for a currency.
    pub fn remove_rate(&self, currency: &Currency) {
        self.rates.remove(currency);
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch(&self, target: Option<&Currency>) -> ExchangeRate {
        let currency = target
            .cloned()
            .unwrap_or_else(|| self.fallback.currency().clone());

        let rate = match self.rates.get(&currency).map(|r| *r) {
            Some(rate) => ExchangeRate::Live {
                rate,
                currency: currency.clone(),
            },
            None => self
                .fallback
                .substitute(FxError::CurrencyNotFound(currency.clone())),
        };

        record_outcome(self.name(), &currency, &rate);
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider() -> FixedRateProvider {
        let provider = FixedRateProvider::new(
            FallbackRate::new(dec!(4000), Currency::new("COP")).unwrap(),
        );
        provider.set_rate(Currency::new("EUR"), dec!(0.92)).unwrap();
        provider
    }

    #[tokio::test]
    async fn test_known_currency_is_live() {
        let rate = provider().fetch(Some(&Currency::new("eur"))).await;

        assert!(rate.is_live());
        assert_eq!(rate.rate(), dec!(0.92));
        assert_eq!(rate.currency().code(), "EUR");
    }

    #[tokio::test]
    async fn test_unknown_currency_falls_back() {
        let rate = provider().fetch(Some(&Currency::new("JPY"))).await;

        assert!(!rate.is_live());
        assert_eq!(rate.rate(), dec!(4000));
        assert_eq!(rate.currency().code(), "COP");
        assert_eq!(
            rate.fallback_reason(),
            Some(&FxError::CurrencyNotFound(Currency::new("JPY")))
        );
    }

    #[tokio::test]
    async fn test_omitted_currency_uses_default() {
        let provider = provider();
        provider.set_rate(Currency::new("COP"), dec!(4100.25)).unwrap();

        let rate = provider.fetch(None).await;

        assert!(rate.is_live());
        assert_eq!(rate.currency().code(), "COP");
        assert_eq!(rate.rate(), dec!(4100.25));
    }

    #[test]
    fn test_set_rate_rejects_non_positive() {
        let provider = provider();
        assert!(provider.set_rate(Currency::new("GBP"), dec!(0)).is_err());
        assert!(provider.set_rate(Currency::new("GBP"), dec!(-0.8)).is_err());
    }
}
