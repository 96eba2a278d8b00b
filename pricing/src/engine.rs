//! Main pricing engine implementation.

use std::sync::Arc;

use bookstore_common::{now, Book, BookId, Currency};
use bookstore_fx::RateProvider;
use bookstore_inventory::{BookStore, StoreError};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::calculation::PriceBreakdown;
use crate::config::PricingConfig;
use crate::error::{PricingError, PricingResult};
use crate::metrics::PricingMetrics;
use crate::result::PriceCalculationResult;

/// Prices books in a local currency and stores the result.
///
/// Holds no per-call state; concurrent calls only meet in the store.
pub struct PricingEngine {
    rates: Arc<dyn RateProvider>,
    store: Arc<dyn BookStore>,
    margin_percentage: u32,
    metrics: Arc<PricingMetrics>,
}

impl PricingEngine {
    /// Create an engine over a rate provider and book store.
    pub fn new(
        rates: Arc<dyn RateProvider>,
        store: Arc<dyn BookStore>,
        config: &PricingConfig,
    ) -> Self {
        Self {
            rates,
            store,
            margin_percentage: config.profit_margin_percentage,
            metrics: Arc::new(PricingMetrics::new()),
        }
    }

    pub fn margin_percentage(&self) -> u32 {
        self.margin_percentage
    }

    pub fn metrics(&self) -> Arc<PricingMetrics> {
        self.metrics.clone()
    }

    /// Price `book` in `target` (or the default currency) and store the new
    /// selling price.
    ///
    /// On success `book.selling_price_local` and `book.updated_at` are
    /// updated to match what was stored. An unavailable rate source is not an
    /// error: the fallback rate is used and `is_live_rate` is false.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub async fn compute(
        &self,
        book: &mut Book,
        target: Option<&Currency>,
    ) -> PricingResult<PriceCalculationResult> {
        self.metrics.calculation_started();

        match self.price(book, target).await {
            Ok(result) => {
                self.metrics.calculation_succeeded(result.is_live_rate);
                Ok(result)
            }
            Err(e) => {
                self.metrics.calculation_failed();
                warn!(error = %e, code = e.error_code(), "Price calculation failed");
                Err(e)
            }
        }
    }

    /// Load a book from the store and price it.
    pub async fn compute_for(
        &self,
        id: BookId,
        target: Option<&Currency>,
    ) -> PricingResult<PriceCalculationResult> {
        let mut book = match self.store.get(id).await {
            Ok(Some(book)) => book,
            Ok(None) => {
                self.metrics.calculation_started();
                self.metrics.calculation_failed();
                warn!(book_id = %id, "Cannot price missing book");
                return Err(PricingError::NotFound(id));
            }
            Err(source) => {
                self.metrics.calculation_started();
                self.metrics.calculation_failed();
                return Err(PricingError::CalculationFailure {
                    book_id: id,
                    source,
                });
            }
        };

        self.compute(&mut book, target).await
    }

    async fn price(
        &self,
        book: &mut Book,
        target: Option<&Currency>,
    ) -> PricingResult<PriceCalculationResult> {
        // Checked before the rate lookup so bad input costs no request.
        if book.cost_usd <= Decimal::ZERO {
            return Err(PricingError::InvalidCost(book.cost_usd));
        }

        let rate = self.rates.fetch(target).await;
        let breakdown = PriceBreakdown::calculate(book.cost_usd, rate.rate(), self.margin_percentage)?;

        let stored_at = now();
        self.store
            .update_selling_price(book.id, breakdown.selling_price_local, stored_at)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(id) => PricingError::NotFound(id),
                source => PricingError::CalculationFailure {
                    book_id: book.id,
                    source,
                },
            })?;
        book.set_selling_price(breakdown.selling_price_local, stored_at);

        let result = PriceCalculationResult {
            book_id: book.id,
            cost_usd: book.cost_usd,
            exchange_rate: rate.rate(),
            cost_local: breakdown.cost_local,
            margin_percentage: self.margin_percentage,
            selling_price_local: breakdown.selling_price_local,
            currency: rate.currency().clone(),
            calculation_timestamp: now(),
            is_live_rate: rate.is_live(),
        };

        info!(
            selling_price_local = %result.selling_price_local,
            currency = %result.currency,
            margin_percentage = result.margin_percentage,
            is_live_rate = result.is_live_rate,
            "Price calculated"
        );

        Ok(result)
    }
}
