//! Aggregate inventory statistics.

use std::collections::HashMap;

use bookstore_common::{round_half_up, Book};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Number of categories reported in [`InventoryStats::top_categories`].
const TOP_CATEGORIES: usize = 5;

/// Book count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Summary of the whole inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total_books: u64,
    pub total_stock_units: u64,
    /// Mean cost, rounded to cents. Zero for an empty inventory.
    pub average_cost_usd: Decimal,
    pub books_with_calculated_price: u64,
    /// Largest categories, count descending then name ascending.
    pub top_categories: Vec<CategoryCount>,
}

impl InventoryStats {
    /// Compute statistics over a set of books.
    ///
    /// Fails with [`StoreError::CostOverflow`] when the summed cost does
    /// not fit in a `Decimal`.
    pub fn from_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> StoreResult<Self> {
        let mut total_books = 0u64;
        let mut total_stock_units = 0u64;
        let mut total_cost = Decimal::ZERO;
        let mut priced = 0u64;
        let mut categories: HashMap<&str, u64> = HashMap::new();

        for book in books {
            total_books += 1;
            total_stock_units += u64::from(book.stock_quantity);
            total_cost = total_cost
                .checked_add(book.cost_usd)
                .ok_or(StoreError::CostOverflow)?;
            if book.selling_price_local.is_some() {
                priced += 1;
            }
            *categories.entry(book.category.as_str()).or_default() += 1;
        }

        let average_cost_usd = if total_books == 0 {
            Decimal::ZERO
        } else {
            round_half_up(total_cost / Decimal::from(total_books))
        };

        let mut top_categories: Vec<CategoryCount> = categories
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        top_categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        top_categories.truncate(TOP_CATEGORIES);

        Ok(Self {
            total_books,
            total_stock_units,
            average_cost_usd,
            books_with_calculated_price: priced,
            top_categories,
        })
    }
}
