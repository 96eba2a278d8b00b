//! Book records held by the inventory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identifiers::BookId;

/// A book in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier.
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// ISBN-10 or ISBN-13, unique within the store.
    pub isbn: String,
    /// Acquisition cost in USD.
    pub cost_usd: Decimal,
    /// Selling price in local currency, set by the last price calculation.
    pub selling_price_local: Option<Decimal>,
    pub stock_quantity: u32,
    pub category: String,
    /// ISO 3166 alpha-2 code of the supplier's country.
    pub supplier_country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a stored record from creation input.
    pub fn from_new(id: BookId, new: NewBook, at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            author: new.author,
            isbn: new.isbn,
            cost_usd: new.cost_usd,
            selling_price_local: new.selling_price_local,
            stock_quantity: new.stock_quantity,
            category: new.category,
            supplier_country: new.supplier_country.to_uppercase(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Apply a patch. Fields left as `None` are untouched.
    pub fn apply(&mut self, update: BookUpdate, at: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(isbn) = update.isbn {
            self.isbn = isbn;
        }
        if let Some(cost) = update.cost_usd {
            self.cost_usd = cost;
        }
        if let Some(price) = update.selling_price_local {
            self.selling_price_local = Some(price);
        }
        if let Some(qty) = update.stock_quantity {
            self.stock_quantity = qty;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(country) = update.supplier_country {
            self.supplier_country = country.to_uppercase();
        }
        self.updated_at = at;
    }

    /// Write a freshly calculated selling price.
    ///
    /// Only `selling_price_local` and `updated_at` change.
    pub fn set_selling_price(&mut self, price: Decimal, at: DateTime<Utc>) {
        self.selling_price_local = Some(price);
        self.updated_at = at;
    }
}

/// Input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cost_usd: Decimal,
    #[serde(default)]
    pub selling_price_local: Option<Decimal>,
    #[serde(default)]
    pub stock_quantity: u32,
    pub category: String,
    pub supplier_country: String,
}

/// Partial update of a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub cost_usd: Option<Decimal>,
    pub selling_price_local: Option<Decimal>,
    pub stock_quantity: Option<u32>,
    pub category: Option<String>,
    pub supplier_country: Option<String>,
}
