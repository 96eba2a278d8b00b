//! Reasons a rate lookup degrades to the fallback rate.

use std::time::Duration;

use bookstore_common::Currency;
use thiserror::Error;

/// Why a live rate could not be produced.
///
/// Providers never return these to callers; a failed lookup is carried
/// inside [`ExchangeRate::Fallback`](crate::ExchangeRate) as its reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// The rate source did not answer within the configured bound.
    #[error("Rate request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or protocol failure talking to the rate source.
    #[error("Rate source unreachable: {0}")]
    Transport(String),

    /// The rate source answered with a non-success status.
    #[error("Rate source returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected shape.
    #[error("Malformed rate response: {0}")]
    Parse(String),

    /// The response was well-formed but did not list the currency.
    #[error("Currency {0} not offered by rate source")]
    CurrencyNotFound(Currency),

    /// A rate was present but not a positive number.
    #[error("Invalid rate {rate} for {currency}")]
    InvalidRate { currency: Currency, rate: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FxError {
    /// Stable outcome label used in log events.
    pub fn outcome(&self) -> &'static str {
        match self {
            FxError::Timeout(_) => "timeout",
            FxError::Transport(_) | FxError::ClientBuild(_) => "transport",
            FxError::Status(_) => "status",
            FxError::Parse(_) | FxError::InvalidRate { .. } => "parse",
            FxError::CurrencyNotFound(_) => "currency_not_found",
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::Timeout(_) => "RATE_TIMEOUT",
            FxError::Transport(_) => "RATE_TRANSPORT_ERROR",
            FxError::Status(_) => "RATE_STATUS_ERROR",
            FxError::Parse(_) => "RATE_PARSE_ERROR",
            FxError::CurrencyNotFound(_) => "RATE_CURRENCY_NOT_FOUND",
            FxError::InvalidRate { .. } => "RATE_INVALID",
            FxError::ClientBuild(_) => "RATE_CLIENT_ERROR",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
