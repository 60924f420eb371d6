//! Core types for GoMarket.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{CartItem, CartSummary, NewCartItem};
pub use id::*;
pub use price::{Price, PriceError};
