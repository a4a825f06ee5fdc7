//! Shared helpers for Essenza integration tests.
//!
//! The scenario tests live in `tests/`; this library only provides common
//! fixtures so each scenario file stays focused on behavior.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use essenza_core::{CartItem, CurrencyCode, Price, ProductId, WishlistItem};
use essenza_storefront::notify::RecordingNotifier;
use essenza_storefront::store::MemoryStore;
use essenza_storefront::{CartContainer, OrderBook, WishlistContainer};

/// A cart line fixture priced in USD minor units.
#[must_use]
pub fn cart_item(id: &str, price_minor: i64, quantity: u32) -> CartItem {
    CartItem {
        id: ProductId::new(id),
        name: format!("Perfume {id}"),
        category: "amber".to_owned(),
        price: Price::from_minor(price_minor, CurrencyCode::USD),
        quantity,
        image_url: format!("https://img.example.com/{id}.jpg"),
    }
}

/// A wishlist entry fixture.
#[must_use]
pub fn wishlist_item(id: &str) -> WishlistItem {
    WishlistItem {
        id: ProductId::new(id),
        name: format!("Perfume {id}"),
        category: "floral".to_owned(),
        price: Price::from_major(55, CurrencyCode::USD),
        image_url: format!("https://img.example.com/{id}.jpg"),
        in_stock: true,
    }
}

/// An in-memory store plus recording notifier, shared by every fixture
/// built from them.
#[must_use]
pub fn memory_fixture() -> (Arc<MemoryStore>, Arc<RecordingNotifier>) {
    (Arc::new(MemoryStore::new()), Arc::new(RecordingNotifier::new()))
}

/// A cart over the given store/notifier pair.
///
/// # Panics
///
/// Panics if the guest cart cannot be loaded (an empty memory store never
/// fails).
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn cart_over(store: &Arc<MemoryStore>, notifier: &Arc<RecordingNotifier>) -> CartContainer {
    CartContainer::new(store.clone(), notifier.clone()).unwrap()
}

/// A wishlist over the given store/notifier pair.
///
/// # Panics
///
/// Panics if the guest wishlist cannot be loaded (an empty memory store
/// never fails).
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn wishlist_over(
    store: &Arc<MemoryStore>,
    notifier: &Arc<RecordingNotifier>,
) -> WishlistContainer {
    WishlistContainer::new(store.clone(), notifier.clone()).unwrap()
}

/// An order book over the given store/notifier pair.
#[must_use]
pub fn orders_over(store: &Arc<MemoryStore>, notifier: &Arc<RecordingNotifier>) -> OrderBook {
    OrderBook::new(store.clone(), notifier.clone())
}
