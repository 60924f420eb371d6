//! Key-value persistence backends.
//!
//! The cart mirrors its lines into an external, string-valued key-value store.
//! Anything that can `get` and `set` a string under a key can back a cart:
//!
//! - [`MemoryStore`] - process-local map, shared between clones
//! - [`FileStore`] - one file per key under a directory
//!
//! Only the persistence writer calls `set`, so implementations never see two
//! concurrent writes from the same provider.

mod file;
mod memory;

use std::future::Future;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// An asynchronous string-keyed store with get/set operations.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str)
    -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;
}
