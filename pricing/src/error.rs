//! Pricing error types.

use bookstore_common::BookId;
use bookstore_inventory::StoreError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the pricing engine.
///
/// Rate lookup problems never appear here; they degrade to the fallback
/// rate inside the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The book does not exist.
    #[error("Book not found: {0}")]
    NotFound(BookId),

    /// Cost must be greater than zero.
    #[error("Cost must be greater than 0, got {0}")]
    InvalidCost(Decimal),

    /// The price was computed but could not be stored.
    #[error("Price calculation failed for book {book_id}: {source}")]
    CalculationFailure {
        book_id: BookId,
        #[source]
        source: StoreError,
    },

    /// The product does not fit in a decimal.
    #[error("Decimal overflow pricing {cost_usd} USD at rate {rate}")]
    Overflow { cost_usd: Decimal, rate: Decimal },
}

impl PricingError {
    /// Whether the caller sent something wrong (4xx) rather than the
    /// service failing (503).
    pub fn is_client_error(&self) -> bool {
        matches!(self, PricingError::NotFound(_) | PricingError::InvalidCost(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::NotFound(_) => "BOOK_NOT_FOUND",
            PricingError::InvalidCost(_) => "INVALID_COST",
            PricingError::CalculationFailure { .. } => "CALCULATION_FAILURE",
            PricingError::Overflow { .. } => "CALCULATION_OVERFLOW",
        }
    }
}

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;
