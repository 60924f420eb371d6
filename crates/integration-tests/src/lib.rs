//! Integration tests for GoMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-market-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart operations through a provider and handle
//! - `file_persistence` - Hydration and persistence against the file-backed store
//!
//! This library holds the fixtures shared by the test files.

use std::path::PathBuf;

use go_market_core::{NewCartItem, Price, ProductId};

/// Storage key used by the mobile app.
pub const PRODUCTS_KEY: &str = "@GoMarket:products";

/// A fresh, not yet created directory under the system temp dir.
#[must_use]
pub fn temp_storage_dir() -> PathBuf {
    std::env::temp_dir().join(format!("gomarket-it-{}", uuid::Uuid::new_v4()))
}

/// A product descriptor with predictable fields derived from `id`.
#[must_use]
pub fn product(id: &str, cents: i64) -> NewCartItem {
    NewCartItem {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("http://img.gomarket.test/{id}.png"),
        price: Price::from_cents(cents),
    }
}
