//! Bookstore FX
//!
//! Exchange rate lookup for pricing books in a local currency.
//!
//! A lookup never fails. When the rate source is slow, unreachable,
//! returns something unparseable or does not list the currency, the
//! configured default rate is substituted and the result says so.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore_fx::{HttpRateProvider, RateProvider, RateSourceConfig};
//! use bookstore_common::Currency;
//!
//! let provider = HttpRateProvider::new(RateSourceConfig::from_env()?)?;
//! let rate = provider.fetch(Some(&Currency::new("EUR"))).await;
//! if !rate.is_live() {
//!     // priced with the fallback rate
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod rate;

pub use config::{FallbackRate, RateSourceConfig, DEFAULT_RATE_SOURCE_URL};
pub use error::{FxError, FxResult};
pub use http::HttpRateProvider;
pub use provider::{FixedRateProvider, RateProvider};
pub use rate::ExchangeRate;
