//! The record returned for each price calculation.

use bookstore_common::{BookId, Currency};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of pricing one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCalculationResult {
    pub book_id: BookId,
    pub cost_usd: Decimal,
    /// Rate actually used, local units per USD.
    pub exchange_rate: Decimal,
    pub cost_local: Decimal,
    pub margin_percentage: u32,
    pub selling_price_local: Decimal,
    /// Currency actually used. Differs from the request when the fallback
    /// rate was applied.
    pub currency: Currency,
    pub calculation_timestamp: DateTime<Utc>,
    /// False when the configured fallback rate was used.
    pub is_live_rate: bool,
}
