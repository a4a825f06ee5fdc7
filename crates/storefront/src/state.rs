//! Application state shared by embedders.

use std::sync::Arc;

use crate::cart::CartContainer;
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::notify::{Notifier, TracingNotifier};
use crate::orders::OrderBook;
use crate::services::auth::AuthService;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::wishlist::WishlistContainer;

/// Application state shared across an embedding application.
///
/// Cheaply cloneable via `Arc`; hands out containers and services that all
/// share the same store and notification sink.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    catalog: CatalogClient,
}

impl AppState {
    /// Create application state with the file-backed store rooted at the
    /// configured data directory and the default `tracing` notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root cannot be created or the catalog
    /// client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let store = Arc::new(FileStore::open(config.data_dir.clone())?);
        Self::with_store(config, store, Arc::new(TracingNotifier))
    }

    /// Create application state over an in-memory store (tests, demos).
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn in_memory(config: StorefrontConfig) -> Result<Self> {
        Self::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(TracingNotifier),
        )
    }

    /// Create application state over an explicit store and notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn with_store(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let catalog = CatalogClient::new(&config.catalog)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
                catalog,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a handle to the persisted store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get a handle to the notification sink.
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.inner.notifier)
    }

    /// Get a reference to the remote catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Build a cart container bound to the anonymous scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted guest cart cannot be read.
    pub fn cart(&self) -> Result<CartContainer> {
        CartContainer::new(self.store(), self.notifier())
    }

    /// Build a wishlist container bound to the anonymous scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted guest wishlist cannot be read.
    pub fn wishlist(&self) -> Result<WishlistContainer> {
        WishlistContainer::new(self.store(), self.notifier())
    }

    /// Build the authentication service.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store(), self.notifier())
    }

    /// Build the order book.
    #[must_use]
    pub fn orders(&self) -> OrderBook {
        OrderBook::new(self.store(), self.notifier())
    }
}
