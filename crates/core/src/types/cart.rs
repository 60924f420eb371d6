//! Cart line items and derived totals.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};

/// A product descriptor as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

/// A line in the cart: a product reference plus how many of it.
///
/// Field names match the stored JSON layout, e.g.
/// `{"id":"1","title":"Shirt","image_url":"http://...","price":59.9,"quantity":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Price of the whole line (`price * quantity`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total is out of range.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.times(self.quantity)
    }
}

/// A freshly added product starts with a quantity of one.
impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: 1,
        }
    }
}

/// Totals derived from the cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of distinct lines, including lines at quantity zero.
    pub line_count: usize,
    /// Sum of all line quantities.
    pub item_count: u64,
    /// Sum of all line totals.
    pub subtotal: Price,
}

impl CartSummary {
    /// Compute the summary for a list of cart lines.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if a line total or the subtotal is out
    /// of range.
    pub fn from_items(items: &[CartItem]) -> Result<Self, PriceError> {
        let subtotal = items.iter().try_fold(Price::ZERO, |total, item| {
            total.checked_add(item.line_total()?)
        })?;
        Ok(Self {
            line_count: items.len(),
            item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal,
        })
    }
}
