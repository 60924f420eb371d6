//! Cart error types.
//!
//! Every fallible cart operation returns [`CartError`]. Storage adapters
//! report [`StorageError`], which converts into `CartError::Storage` when it
//! happens during mount and into `CartError::Persist` when it is reported by
//! the persistence writer.

use std::sync::Arc;

use go_market_core::{PriceError, ProductId};
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded for storage.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// A handle was used without a live provider behind it.
    #[error("cart handle must be used within a CartProvider")]
    OutsideProvider,

    /// No cart line exists for the product.
    #[error("Product not in cart: {0}")]
    NotFound(ProductId),

    /// Quantity would exceed `u32::MAX`.
    #[error("Quantity overflow for product: {0}")]
    QuantityOverflow(ProductId),

    /// A cart total could not be computed.
    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    /// Stored cart could not be parsed during hydration.
    #[error("Hydration error: {0}")]
    Hydration(#[from] serde_json::Error),

    /// Stored cart holds more than one line for the same product.
    #[error("Duplicate cart line in stored data: {0}")]
    DuplicateItem(ProductId),

    /// Storage read failed during hydration.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persistence writer reported a failed write.
    #[error("Persist error: {0}")]
    Persist(#[source] Arc<StorageError>),

    /// The cart state lock was poisoned by a panicking mutation.
    #[error("Cart state lock poisoned")]
    LockPoisoned,

    /// The persistence writer stopped before the write settled.
    #[error("Persistence writer stopped")]
    WriterStopped,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::NotFound(ProductId::new("42"));
        assert_eq!(err.to_string(), "Product not in cart: 42");

        let err = CartError::OutsideProvider;
        assert_eq!(
            err.to_string(),
            "cart handle must be used within a CartProvider"
        );
    }

    #[test]
    fn test_storage_error_converts() {
        let err: CartError = StorageError::Unavailable("offline".to_string()).into();
        assert!(matches!(err, CartError::Storage(StorageError::Unavailable(_))));
        assert_eq!(err.to_string(), "Storage error: Storage unavailable: offline");
    }

    #[test]
    fn test_price_error_converts() {
        let err: CartError = PriceError::Overflow.into();
        assert!(matches!(err, CartError::Price(PriceError::Overflow)));
        assert_eq!(err.to_string(), "Price error: price total out of range");
    }

    #[test]
    fn test_persist_error_keeps_source() {
        let err = CartError::Persist(Arc::new(StorageError::Unavailable("disk full".to_string())));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Storage unavailable: disk full"));
    }
}
