//! Price arithmetic.

use bookstore_common::round_half_up;
use rust_decimal::Decimal;

use crate::error::{PricingError, PricingResult};

/// Local cost and selling price for one book at one rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// `cost_usd * rate`, rounded to cents.
    pub cost_local: Decimal,
    /// `cost_usd * rate * (1 + margin / 100)`, rounded to cents.
    pub selling_price_local: Decimal,
}

impl PriceBreakdown {
    /// Price `cost_usd` at `rate` (local units per USD, positive) with a
    /// whole-percent margin.
    ///
    /// The margin is applied to the unrounded local cost. Both outputs are
    /// rounded on their own, half-up.
    pub fn calculate(
        cost_usd: Decimal,
        rate: Decimal,
        margin_percentage: u32,
    ) -> PricingResult<Self> {
        if cost_usd <= Decimal::ZERO {
            return Err(PricingError::InvalidCost(cost_usd));
        }

        let overflow = || PricingError::Overflow { cost_usd, rate };

        let cost_local = cost_usd.checked_mul(rate).ok_or_else(overflow)?;
        let markup = Decimal::ONE + Decimal::new(i64::from(margin_percentage), 2);
        let selling_price = cost_local.checked_mul(markup).ok_or_else(overflow)?;

        Ok(Self {
            cost_local: round_half_up(cost_local),
            selling_price_local: round_half_up(selling_price),
        })
    }
}
