//! In-memory cart state and its mutations.
//!
//! [`CartStore`] is the ordered list of cart lines with the rules for
//! changing it. It does no I/O; [`CartProvider`](crate::CartProvider) wraps it
//! in a lock and mirrors every change to storage.
//!
//! Invariants:
//! - at most one line per product id
//! - lines keep their insertion order; updates replace a line in place
//! - lines are never removed, even at quantity zero

use std::collections::HashSet;

use go_market_core::{CartItem, CartSummary, NewCartItem, ProductId};

use crate::error::{CartError, Result};

/// Outcome of a mutation, carrying the line's quantity afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The line changed and the new state must be persisted.
    Updated(u32),
    /// Nothing changed; no write is needed.
    Unchanged(u32),
}

impl Change {
    /// Quantity of the affected line after the operation.
    #[must_use]
    pub const fn quantity(self) -> u32 {
        match self {
            Self::Updated(q) | Self::Unchanged(q) => q,
        }
    }

    /// Whether the operation changed state.
    #[must_use]
    pub const fn is_updated(self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Ordered cart lines keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from stored lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateItem` if two lines share a product id.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CartError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Build a cart from the raw stored value.
    ///
    /// `None` or a blank string means nothing was stored and yields an empty
    /// cart. Anything else must be a JSON array of cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Hydration` if the value is not a valid cart list and
    /// `CartError::DuplicateItem` if it repeats a product id.
    pub fn hydrate(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::new()),
            Some(json) => Self::from_items(serde_json::from_str(json)?),
        }
    }

    /// Cart lines in order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line for a product, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Totals over all lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Price` if a total is out of range.
    pub fn summary(&self) -> Result<CartSummary> {
        Ok(CartSummary::from_items(&self.items)?)
    }

    fn line_mut(&mut self, id: &ProductId) -> Result<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| CartError::NotFound(id.clone()))
    }

    /// Add one unit of a product.
    ///
    /// An existing line is bumped in place; otherwise a new line with
    /// quantity one is appended.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityOverflow` if the line is already at `u32::MAX`.
    pub fn add(&mut self, item: NewCartItem) -> Result<Change> {
        if self.get(&item.id).is_some() {
            return self.increment(&item.id);
        }
        self.items.push(CartItem::from(item));
        Ok(Change::Updated(1))
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if there is no line for `id` and
    /// `CartError::QuantityOverflow` if the line is already at `u32::MAX`.
    pub fn increment(&mut self, id: &ProductId) -> Result<Change> {
        let line = self.line_mut(id)?;
        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or_else(|| CartError::QuantityOverflow(id.clone()))?;
        Ok(Change::Updated(line.quantity))
    }

    /// Remove one unit from an existing line.
    ///
    /// A line already at zero is left as is.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if there is no line for `id`.
    pub fn decrement(&mut self, id: &ProductId) -> Result<Change> {
        let line = self.line_mut(id)?;
        if line.quantity == 0 {
            return Ok(Change::Unchanged(0));
        }
        line.quantity -= 1;
        Ok(Change::Updated(line.quantity))
    }
}
