//! Bookstore Inventory
//!
//! Storage for book records: CRUD, category search, low-stock listing and
//! aggregate statistics, plus the partial price update used by pricing.

pub mod error;
pub mod memory;
pub mod stats;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBookStore;
pub use stats::{CategoryCount, InventoryStats};
pub use store::{BookStore, DEFAULT_LOW_STOCK_THRESHOLD};
