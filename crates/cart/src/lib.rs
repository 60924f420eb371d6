//! GoMarket Cart - Cart state container with durable persistence.
//!
//! # Architecture
//!
//! - [`CartProvider`] owns the in-memory cart lines for a session
//! - [`CartHandle`] is the only way consumers read or change the cart
//! - Every change is mirrored to a [`KeyValueStore`] by a single background
//!   writer that coalesces queued snapshots (latest state wins)
//!
//! # Storage format
//!
//! The cart lives under one key (default `@GoMarket:products`) as a JSON
//! array of lines:
//!
//! ```json
//! [{"id":"1","title":"Shirt","image_url":"http://...","price":59.9,"quantity":2}]
//! ```
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Cart and storage errors
//! - [`storage`] - Key-value store trait and adapters
//! - [`store`] - The cart lines and their mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod storage;
pub mod store;

mod provider;
mod writer;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::{CartError, Result, StorageError};
pub use provider::{CartHandle, CartProvider};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{CartStore, Change};

pub use go_market_core::{CartItem, CartSummary, NewCartItem, Price, PriceError, ProductId};
