//! Essenza Storefront - the storefront state layer.
//!
//! This crate is the state-management half of a perfume retail storefront:
//! identity-scoped cart and wishlist containers over a persisted key-value
//! store, registration/login over a local user directory, a checkout wizard
//! that turns carts into persisted orders, and a client for the remote
//! catalog API. Presentation (components, routing, rendering) is the
//! embedder's concern.
//!
//! # Architecture
//!
//! - [`store`] - the durable key-value adapter and the single key-layout map
//! - [`cart`] / [`wishlist`] - containers binding the pure collection engine
//!   from `essenza-core` to scoped persistence
//! - [`identity`] - the Anonymous/Identified scope that namespaces
//!   collections
//! - [`services::auth`] - registration, login, session keys
//! - [`checkout`] / [`orders`] - the 3-step wizard, the order book, and the
//!   synthetic tracking timeline
//! - [`catalog`] - remote product/OTP API client (fixed timeout, no retries)
//!
//! Everything except the catalog client is synchronous: containers never
//! suspend, and operations apply in call order on a single logical thread.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod identity;
pub mod notify;
pub mod orders;
pub mod services;
pub mod state;
pub mod store;
pub mod wishlist;

pub use cart::CartContainer;
pub use catalog::{CatalogClient, CatalogError, RemoteProduct};
pub use checkout::{CheckoutStep, CheckoutWizard, OrderDraft};
pub use config::{CatalogConfig, ConfigError, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use identity::IdentityScope;
pub use notify::{NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use orders::{Cancellation, Order, OrderBook, OrderError, ShippingAddress, TrackingEvent};
pub use state::AppState;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use wishlist::{AddOutcome, WishlistContainer};

/// Initialize tracing with an `EnvFilter`.
///
/// Defaults to info level for this crate if `RUST_LOG` is not set. Embedders
/// with their own subscriber should skip this.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "essenza_storefront=info".into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
