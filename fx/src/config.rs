//! Rate source configuration.

use std::str::FromStr;
use std::time::Duration;

use bookstore_common::{constants, BookstoreError, Currency};
use rust_decimal::Decimal;

use crate::error::FxError;
use crate::rate::ExchangeRate;

/// Public endpoint returning `{"rates": {"EUR": 0.92, ...}}` for base USD.
pub const DEFAULT_RATE_SOURCE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Rate and currency substituted whenever a lookup fails.
///
/// The rate is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRate {
    rate: Decimal,
    currency: Currency,
}

impl FallbackRate {
    /// Create a fallback, rejecting a non-positive rate or malformed code.
    pub fn new(rate: Decimal, currency: Currency) -> Result<Self, BookstoreError> {
        if rate <= Decimal::ZERO {
            return Err(BookstoreError::Configuration(format!(
                "default exchange rate must be positive, got {}",
                rate
            )));
        }
        if !currency.is_valid() {
            return Err(BookstoreError::Configuration(format!(
                "default currency '{}' is not a 2-3 letter code",
                currency
            )));
        }
        Ok(Self { rate, currency })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// The fallback as a lookup result.
    pub fn substitute(&self, reason: FxError) -> ExchangeRate {
        ExchangeRate::Fallback {
            rate: self.rate,
            currency: self.currency.clone(),
            reason,
        }
    }
}

impl Default for FallbackRate {
    fn default() -> Self {
        Self {
            rate: Decimal::ONE,
            currency: Currency::usd(),
        }
    }
}

/// Configuration for the remote rate source.
#[derive(Debug, Clone)]
pub struct RateSourceConfig {
    /// URL answering a GET with a `rates` mapping.
    pub endpoint: String,
    /// Bound on one request, connection through body.
    pub timeout: Duration,
    /// Used when no live rate is available.
    pub fallback: FallbackRate,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RATE_SOURCE_URL.to_string(),
            timeout: constants::rate_fetch_timeout(),
            fallback: FallbackRate::default(),
        }
    }
}

impl RateSourceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, BookstoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    ///
    /// Unset keys keep their defaults; set keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BookstoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RATE_SOURCE_URL") {
            config.endpoint = url;
        }

        if let Some(secs) = lookup("RATE_FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                BookstoreError::Configuration(format!(
                    "RATE_FETCH_TIMEOUT_SECS must be an integer, got '{}'",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        let rate = match lookup("DEFAULT_EXCHANGE_RATE") {
            Some(raw) => Decimal::from_str(raw.trim()).map_err(|_| {
                BookstoreError::Configuration(format!(
                    "DEFAULT_EXCHANGE_RATE must be a decimal, got '{}'",
                    raw
                ))
            })?,
            None => config.fallback.rate(),
        };
        let currency = match lookup("DEFAULT_CURRENCY") {
            Some(code) => Currency::new(code),
            None => config.fallback.currency().clone(),
        };
        config.fallback = FallbackRate::new(rate, currency)?;

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), BookstoreError> {
        if self.endpoint.trim().is_empty() {
            return Err(BookstoreError::Configuration(
                "rate source URL cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(BookstoreError::Configuration(
                "rate fetch timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}
