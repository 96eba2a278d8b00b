//! Bookstore Pricing
//!
//! Turns a book's USD cost into a local-currency selling price: fetch a
//! rate, convert with exact decimals, apply the profit margin, round each
//! figure to cents half-up, and store the new price on the book.

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod result;

pub use calculation::PriceBreakdown;
pub use config::PricingConfig;
pub use engine::PricingEngine;
pub use error::{PricingError, PricingResult};
pub use metrics::{PricingMetrics, PricingMetricsSnapshot};
pub use result::PriceCalculationResult;
