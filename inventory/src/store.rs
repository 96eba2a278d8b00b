//! The storage trait.

use async_trait::async_trait;
use bookstore_common::{Book, BookId, BookUpdate, NewBook};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::StoreResult;
use crate::stats::InventoryStats;

/// Threshold used by low-stock listings when the caller gives none.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Persistence for books.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new book and assign its ID.
    async fn create(&self, book: NewBook) -> StoreResult<Book>;

    async fn get(&self, id: BookId) -> StoreResult<Option<Book>>;

    /// All books, newest first.
    async fn list(&self) -> StoreResult<Vec<Book>>;

    /// Apply a partial update and return the new record.
    async fn update(&self, id: BookId, update: BookUpdate) -> StoreResult<Book>;

    /// Remove a book and return what was removed.
    async fn delete(&self, id: BookId) -> StoreResult<Book>;

    /// Books whose category contains `query`, ignoring case.
    async fn search_by_category(&self, query: &str) -> StoreResult<Vec<Book>>;

    /// Books with `stock_quantity <= threshold`.
    async fn low_stock(&self, threshold: u32) -> StoreResult<Vec<Book>>;

    async fn stats(&self) -> StoreResult<InventoryStats>;

    /// Write only `selling_price_local` and `updated_at`.
    ///
    /// Concurrent writers for the same book: last write wins.
    async fn update_selling_price(
        &self,
        id: BookId,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;
}
