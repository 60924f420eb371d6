//! Integration tests for cart operations through a provider and its handles.
//!
//! These tests run against the in-memory store and check what ends up
//! persisted after each kind of operation.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use go_market_cart::{
    CartConfig, CartError, CartHandle, CartItem, CartProvider, KeyValueStore, MemoryStore,
};
use go_market_core::{Price, ProductId};
use go_market_integration_tests::{PRODUCTS_KEY, product};

async fn persisted(store: &MemoryStore) -> Vec<CartItem> {
    let raw = store.get(PRODUCTS_KEY).await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

async fn mount(store: &MemoryStore) -> CartProvider {
    CartProvider::mount(store.clone(), &CartConfig::default())
        .await
        .unwrap()
}

// =============================================================================
// Add / Increment / Decrement
// =============================================================================

#[tokio::test]
async fn test_add_same_product_twice_keeps_one_line() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();

    cart.add_to_cart(product("shirt", 5990)).unwrap();
    cart.add_to_cart(product("shirt", 5990)).unwrap();

    let products = cart.products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].quantity, 2);
}

#[tokio::test]
async fn test_lines_keep_insertion_order() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();

    cart.add_to_cart(product("a", 100)).unwrap();
    cart.add_to_cart(product("b", 200)).unwrap();
    cart.add_to_cart(product("c", 300)).unwrap();
    cart.increment(&ProductId::new("a")).unwrap();

    let ids: Vec<String> = cart
        .products()
        .unwrap()
        .into_iter()
        .map(|item| item.id.into_inner())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_increment_leaves_other_lines_unchanged() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();

    cart.add_to_cart(product("a", 100)).unwrap();
    cart.add_to_cart(product("b", 200)).unwrap();
    let before = cart.products().unwrap();

    assert_eq!(cart.increment(&ProductId::new("b")).unwrap(), 2);

    let after = cart.products().unwrap();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].quantity, before[1].quantity + 1);
}

#[tokio::test]
async fn test_decrement_never_goes_negative_or_removes() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();
    let id = ProductId::new("a");

    cart.add_to_cart(product("a", 100)).unwrap();
    assert_eq!(cart.decrement(&id).unwrap(), 0);
    assert_eq!(cart.decrement(&id).unwrap(), 0);
    assert_eq!(cart.decrement(&id).unwrap(), 0);

    let products = cart.products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].quantity, 0);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_each_mutation_persists_current_state() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();

    cart.add_to_cart(product("a", 100)).unwrap();
    cart.flush().await.unwrap();
    assert_eq!(persisted(&store).await, cart.products().unwrap());

    cart.increment(&ProductId::new("a")).unwrap();
    cart.flush().await.unwrap();
    assert_eq!(persisted(&store).await, cart.products().unwrap());

    cart.decrement(&ProductId::new("a")).unwrap();
    cart.flush().await.unwrap();
    assert_eq!(persisted(&store).await, cart.products().unwrap());
}

/// Rapid calls used to persist a stale snapshot (the add path wrote the state
/// from before its own change). Storage must end at the final state.
#[tokio::test]
async fn test_burst_of_operations_persists_final_state() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();

    for _ in 0..50 {
        cart.add_to_cart(product("a", 100)).unwrap();
    }
    for _ in 0..20 {
        cart.decrement(&ProductId::new("a")).unwrap();
    }
    cart.add_to_cart(product("b", 250)).unwrap();

    cart.flush().await.unwrap();
    let stored = persisted(&store).await;
    assert_eq!(stored, cart.products().unwrap());
    assert_eq!(stored[0].quantity, 30);
    assert_eq!(stored[1].quantity, 1);
}

#[tokio::test]
async fn test_handles_share_one_cart() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let list_screen = provider.handle();
    let detail_screen = list_screen.clone();

    detail_screen.add_to_cart(product("a", 100)).unwrap();
    list_screen.increment(&ProductId::new("a")).unwrap();

    assert_eq!(detail_screen.products().unwrap()[0].quantity, 2);
    assert_eq!(list_screen.summary().unwrap().subtotal, Price::from_cents(200));
}

#[tokio::test]
async fn test_handles_on_other_tasks() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();
    cart.add_to_cart(product("a", 100)).unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handle = provider.handle();
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                handle.increment(&ProductId::new("a")).unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    provider.unmount().await.unwrap();
    assert_eq!(persisted(&store).await[0].quantity, 81);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_missing_product_reports_not_found() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();

    let err = cart.increment(&ProductId::new("ghost")).unwrap_err();
    assert!(matches!(err, CartError::NotFound(ref id) if id.as_str() == "ghost"));
    assert!(cart.products().unwrap().is_empty());
}

#[tokio::test]
async fn test_handle_without_provider_fails_first() {
    let cart = CartHandle::detached();
    let err = cart.add_to_cart(product("a", 100)).unwrap_err();
    assert!(matches!(err, CartError::OutsideProvider));
    assert_eq!(
        err.to_string(),
        "cart handle must be used within a CartProvider"
    );
}

#[tokio::test]
async fn test_handle_outliving_provider_fails() {
    let store = MemoryStore::new();
    let provider = mount(&store).await;
    let cart = provider.handle();
    drop(provider);

    assert!(matches!(cart.products(), Err(CartError::OutsideProvider)));
}
