//! Cart commands.
//!
//! Each command mounts the cart from the file-backed store, runs one
//! operation, and unmounts so the result is on disk before the process exits.
//!
//! # Environment Variables
//!
//! - `GOMARKET_STORAGE_DIR` - Directory holding the stored cart
//! - `GOMARKET_CART_KEY` - Storage key for the cart lines

use go_market_cart::{CartConfig, CartHandle, CartProvider, FileStore};
use go_market_core::{NewCartItem, ProductId};
use tracing::info;

/// Mount the cart, run `op` against it, and unmount.
async fn with_cart<T>(
    config: &CartConfig,
    op: impl FnOnce(&CartHandle) -> go_market_cart::Result<T>,
) -> Result<T, Box<dyn std::error::Error>> {
    let store = FileStore::new(&config.storage_dir);
    let provider = CartProvider::mount(store, config).await?;

    let result = op(&provider.handle());
    provider.unmount().await?;

    Ok(result?)
}

/// Print every cart line and the cart totals.
///
/// # Errors
///
/// Returns an error if the stored cart cannot be read or parsed, or a total
/// is out of range.
pub async fn show(config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (products, summary) =
        with_cart(config, |cart| Ok((cart.products()?, cart.summary()?))).await?;

    if products.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    info!("Cart");
    info!("====");
    for item in &products {
        let line_total = item.line_total()?;
        info!(
            "  {} x{} {} @ {} = {}",
            item.id, item.quantity, item.title, item.price, line_total
        );
    }
    info!("Lines: {}", summary.line_count);
    info!("Items: {}", summary.item_count);
    info!("Subtotal: {}", summary.subtotal);

    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or the write fails.
pub async fn add(
    config: &CartConfig,
    item: NewCartItem,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = item.id.clone();
    let quantity = with_cart(config, |cart| cart.add_to_cart(item)).await?;
    info!(id = %id, quantity, "Added to cart");
    Ok(())
}

/// Add one unit to an existing line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart, the cart cannot be
/// loaded, or the write fails.
pub async fn increment(
    config: &CartConfig,
    id: &ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    let quantity = with_cart(config, |cart| cart.increment(id)).await?;
    info!(id = %id, quantity, "Incremented");
    Ok(())
}

/// Remove one unit from an existing line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart, the cart cannot be
/// loaded, or the write fails.
pub async fn decrement(
    config: &CartConfig,
    id: &ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    let quantity = with_cart(config, |cart| cart.decrement(id)).await?;
    info!(id = %id, quantity, "Decremented");
    Ok(())
}
