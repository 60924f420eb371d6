//! Cart provider and the handles consumers use to reach it.
//!
//! A [`CartProvider`] owns the cart for the lifetime of a session: it
//! hydrates the lines from storage, holds them in memory, and runs the
//! persistence writer. Consumers never see the provider directly; they get a
//! cheap [`CartHandle`] passed to them explicitly.
//!
//! Handles hold a weak reference. Once the provider is unmounted (or was never
//! there, see [`CartHandle::detached`]) every operation fails with
//! `CartError::OutsideProvider` before touching any state.
//!
//! # Example
//!
//! ```rust,ignore
//! use go_market_cart::{CartConfig, CartProvider, MemoryStore};
//!
//! let provider = CartProvider::mount(MemoryStore::new(), &CartConfig::default()).await?;
//! let cart = provider.handle();
//!
//! cart.add_to_cart(item)?;
//! cart.increment(&item_id)?;
//! cart.flush().await?;
//!
//! provider.unmount().await?;
//! ```

use std::sync::{Arc, RwLock, Weak};

use go_market_core::{CartItem, CartSummary, NewCartItem, ProductId};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::KeyValueStore;
use crate::store::{Change, CartStore};
use crate::writer::PersistenceWriter;

struct CartInner {
    state: RwLock<CartStore>,
    writer: PersistenceWriter,
}

impl CartInner {
    /// Apply a mutation under the write lock and queue the result if it changed.
    fn mutate(&self, op: impl FnOnce(&mut CartStore) -> Result<Change>) -> Result<Change> {
        let mut state = self.state.write().map_err(|_| CartError::LockPoisoned)?;
        let change = op(&mut *state)?;
        if change.is_updated() {
            self.writer.publish(state.items().to_vec());
        }
        Ok(change)
    }

    fn read<R>(&self, f: impl FnOnce(&CartStore) -> R) -> Result<R> {
        let state = self.state.read().map_err(|_| CartError::LockPoisoned)?;
        Ok(f(&*state))
    }
}

/// Owner of the cart state and its persistence.
pub struct CartProvider {
    inner: Arc<CartInner>,
    task: JoinHandle<()>,
}

impl CartProvider {
    /// Hydrate the cart from `store` and start persisting changes to it.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the stored value cannot be read,
    /// `CartError::Hydration` if it is not a valid cart list, and
    /// `CartError::DuplicateItem` if it lists a product twice.
    #[instrument(skip_all, fields(key = %config.storage_key))]
    pub async fn mount<S: KeyValueStore>(store: S, config: &CartConfig) -> Result<Self> {
        let raw = store.get(&config.storage_key).await?;
        let cart = CartStore::hydrate(raw.as_deref())?;
        info!(lines = cart.len(), "Cart hydrated");

        let (writer, task) = PersistenceWriter::spawn(store, config.storage_key.clone());

        Ok(Self {
            inner: Arc::new(CartInner {
                state: RwLock::new(cart),
                writer,
            }),
            task,
        })
    }

    /// A handle for consumers of this cart.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Wait for every change made so far to reach storage.
    ///
    /// # Errors
    ///
    /// See [`CartHandle::flush`].
    pub async fn flush(&self) -> Result<()> {
        self.inner.writer.flush().await
    }

    /// Flush pending writes, stop the writer, and detach all handles.
    ///
    /// A handle that is mid-operation keeps the writer running until it
    /// returns, so changes it makes are still written before this resolves.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Persist` if the last write failed, or
    /// `CartError::WriterStopped` if the writer task panicked.
    #[instrument(skip_all)]
    pub async fn unmount(self) -> Result<()> {
        if let Err(e) = self.inner.writer.flush().await {
            warn!(error = %e, "Cart flush before unmount failed");
        }

        let outcomes = self.inner.writer.outcomes();
        // The writer exits once the last strong reference is gone and every
        // published snapshot has been written.
        drop(self.inner);
        self.task.await.map_err(|_| CartError::WriterStopped)?;

        let last_write = outcomes.latest();
        if let Err(e) = &last_write {
            warn!(error = %e, "Final cart write failed");
        }
        info!("Cart provider unmounted");
        last_write
    }
}

/// Consumer access to a cart: read its lines and add, increment, or
/// decrement products.
///
/// Cloning a handle is cheap. A handle does not keep the provider alive.
#[derive(Clone, Default)]
pub struct CartHandle {
    inner: Weak<CartInner>,
}

impl std::fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl CartHandle {
    /// A handle with no provider behind it.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether a live provider backs this handle.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn provider(&self) -> Result<Arc<CartInner>> {
        self.inner.upgrade().ok_or(CartError::OutsideProvider)
    }

    /// Current cart lines in order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` without a live provider.
    pub fn products(&self) -> Result<Vec<CartItem>> {
        self.provider()?.read(|cart| cart.items().to_vec())
    }

    /// Totals over the current cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` without a live provider and
    /// `CartError::Price` if a total is out of range.
    pub fn summary(&self) -> Result<CartSummary> {
        self.provider()?.read(CartStore::summary)?
    }

    /// Add one unit of `item`, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` without a live provider and
    /// `CartError::QuantityOverflow` if the line is full.
    pub fn add_to_cart(&self, item: NewCartItem) -> Result<u32> {
        let provider = self.provider()?;
        let id = item.id.clone();
        let change = provider.mutate(|cart| cart.add(item))?;
        debug!(id = %id, quantity = change.quantity(), "Added product to cart");
        Ok(change.quantity())
    }

    /// Add one unit to the line for `id`, returning its new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` without a live provider,
    /// `CartError::NotFound` if `id` is not in the cart, and
    /// `CartError::QuantityOverflow` if the line is full.
    pub fn increment(&self, id: &ProductId) -> Result<u32> {
        let change = self.provider()?.mutate(|cart| cart.increment(id))?;
        debug!(id = %id, quantity = change.quantity(), "Incremented cart line");
        Ok(change.quantity())
    }

    /// Remove one unit from the line for `id`, returning its new quantity.
    ///
    /// A line at zero stays at zero and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` without a live provider and
    /// `CartError::NotFound` if `id` is not in the cart.
    pub fn decrement(&self, id: &ProductId) -> Result<u32> {
        let change = self.provider()?.mutate(|cart| cart.decrement(id))?;
        if change.is_updated() {
            debug!(id = %id, quantity = change.quantity(), "Decremented cart line");
        } else {
            debug!(id = %id, "Cart line already at zero");
        }
        Ok(change.quantity())
    }

    /// Wait until every change made so far has been written to storage.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` without a live provider,
    /// `CartError::Persist` if the settling write failed, and
    /// `CartError::WriterStopped` if the writer is gone.
    pub async fn flush(&self) -> Result<()> {
        let provider = self.provider()?;
        provider.writer.flush().await
    }
}
