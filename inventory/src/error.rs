//! Storage error types.

use bookstore_common::BookId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by a [`BookStore`](crate::BookStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No book with this ID.
    #[error("Book not found: {0}")]
    NotFound(BookId),

    /// Another book already uses this ISBN.
    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// Cost must be greater than zero.
    #[error("Cost must be greater than 0, got {0}")]
    InvalidCost(Decimal),

    /// Summing book costs exceeded the decimal range.
    #[error("Total cost of the inventory is out of range")]
    CostOverflow,

    /// The backing storage could not complete the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "BOOK_NOT_FOUND",
            StoreError::DuplicateIsbn(_) => "DUPLICATE_ISBN",
            StoreError::InvalidCost(_) => "INVALID_COST",
            StoreError::CostOverflow => "COST_OVERFLOW",
            StoreError::Unavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
