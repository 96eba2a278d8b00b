//! In-process book store.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bookstore_common::{now, Book, BookId, BookUpdate, NewBook};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::stats::InventoryStats;
use crate::store::BookStore;

/// Thread-safe book store kept in memory.
///
/// Lock order is always ISBN index before book map.
pub struct InMemoryBookStore {
    books: DashMap<BookId, Book>,
    /// Normalised ISBN to owning book.
    isbns: DashMap<String, BookId>,
    next_id: AtomicU64,
}

impl InMemoryBookStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            isbns: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Get the number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn sorted(mut books: Vec<Book>) -> Vec<Book> {
        books.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        books
    }

    fn filtered(&self, keep: impl Fn(&Book) -> bool) -> Vec<Book> {
        let books = self
            .books
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        Self::sorted(books)
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

/// ISBNs are compared without hyphens or spaces.
fn isbn_key(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn validate_cost(cost: Decimal) -> StoreResult<()> {
    if cost <= Decimal::ZERO {
        return Err(StoreError::InvalidCost(cost));
    }
    Ok(())
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    #[instrument(skip(self, book), fields(isbn = %book.isbn))]
    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        validate_cost(book.cost_usd)?;

        let book = match self.isbns.entry(isbn_key(&book.isbn)) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateIsbn(book.isbn)),
            Entry::Vacant(slot) => {
                let id = BookId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                let book = Book::from_new(id, book, now());
                slot.insert(id);
                self.books.insert(id, book.clone());
                book
            }
        };

        info!(book_id = %book.id, title = %book.title, "Book created");
        Ok(book)
    }

    async fn get(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self.books.get(&id).map(|b| b.clone()))
    }

    async fn list(&self) -> StoreResult<Vec<Book>> {
        Ok(self.filtered(|_| true))
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: BookId, update: BookUpdate) -> StoreResult<Book> {
        if let Some(cost) = update.cost_usd {
            validate_cost(cost)?;
        }

        loop {
            let current_key = self
                .books
                .get(&id)
                .map(|b| isbn_key(&b.isbn))
                .ok_or(StoreError::NotFound(id))?;

            let mut reserved = None;
            if let Some(new_isbn) = update.isbn.as_deref() {
                let new_key = isbn_key(new_isbn);
                if new_key != current_key {
                    match self.isbns.entry(new_key.clone()) {
                        Entry::Occupied(_) => {
                            return Err(StoreError::DuplicateIsbn(new_isbn.to_string()))
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(id);
                        }
                    }
                    reserved = Some(new_key);
                }
            }

            // An ISBN change that landed since `current_key` was read means
            // the reservation is stale: release it and go again.
            let applied = match self.books.get_mut(&id) {
                Some(mut book)
                    if update.isbn.is_none() || isbn_key(&book.isbn) == current_key =>
                {
                    book.apply(update.clone(), now());
                    Some(book.clone())
                }
                Some(_) => None,
                None => {
                    if let Some(key) = reserved {
                        self.isbns.remove(&key);
                    }
                    return Err(StoreError::NotFound(id));
                }
            };

            let Some(updated) = applied else {
                if let Some(key) = reserved {
                    self.isbns.remove(&key);
                }
                debug!(book_id = %id, "ISBN changed concurrently, retrying update");
                continue;
            };

            if reserved.is_some() {
                self.isbns.remove_if(&current_key, |_, owner| *owner == id);
            }

            info!(book_id = %id, "Book updated");
            return Ok(updated);
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: BookId) -> StoreResult<Book> {
        let (_, book) = self.books.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.isbns.remove(&isbn_key(&book.isbn));

        info!(book_id = %id, title = %book.title, "Book deleted");
        Ok(book)
    }

    async fn search_by_category(&self, query: &str) -> StoreResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        debug!(category = %needle, "Searching books by category");
        Ok(self.filtered(|b| b.category.to_lowercase().contains(&needle)))
    }

    async fn low_stock(&self, threshold: u32) -> StoreResult<Vec<Book>> {
        Ok(self.filtered(|b| b.stock_quantity <= threshold))
    }

    async fn stats(&self) -> StoreResult<InventoryStats> {
        let books: Vec<Book> = self.books.iter().map(|b| b.value().clone()).collect();
        InventoryStats::from_books(&books)
    }

    async fn update_selling_price(
        &self,
        id: BookId,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut book = self.books.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        book.set_selling_price(price, at);

        debug!(book_id = %id, selling_price_local = %price, "Selling price stored");
        Ok(())
    }
}
