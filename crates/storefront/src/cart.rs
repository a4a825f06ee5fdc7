//! Cart container: the stateful binding between the pure collection engine
//! and the persisted store.
//!
//! The container owns one identity-scoped working set. Every mutation runs
//! through the engine, then persists the full collection under the scoped
//! key before returning; totals are always derived fresh from the engine.
//! Scope changes (login/logout) go through [`CartContainer::bind_scope`],
//! which replaces the working set with the newly scoped persisted copy -
//! anonymous items are never merged into an account.

use std::sync::Arc;

use tracing::instrument;

use essenza_core::{CartItem, Collection, CurrencyCode, Price, ProductId};

use crate::error::{Result, StorefrontError};
use crate::identity::IdentityScope;
use crate::notify::{NoticeLevel, Notifier};
use crate::store::{KeyValueStore, keys, read_json, write_json};

/// Identity-scoped shopping cart.
pub struct CartContainer {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    scope: IdentityScope,
    items: Collection<CartItem>,
    currency: CurrencyCode,
}

impl CartContainer {
    /// Create a cart bound to the anonymous scope, loading any persisted
    /// guest cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the persisted copy cannot be read.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let mut cart = Self {
            store,
            notifier,
            scope: IdentityScope::Anonymous,
            items: Collection::new(),
            currency: CurrencyCode::default(),
        };
        cart.reload()?;
        Ok(cart)
    }

    /// The identity scope this cart is bound to.
    #[must_use]
    pub const fn scope(&self) -> &IdentityScope {
        &self.scope
    }

    /// Re-read the scoped key and replace the working set.
    ///
    /// An absent key yields an empty cart (collections are created lazily).
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` on read or parse failure.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub fn reload(&mut self) -> Result<()> {
        let key = keys::cart(&self.scope);
        let items: Vec<CartItem> = read_json(self.store.as_ref(), &key)?.unwrap_or_default();
        self.items.load(items);
        Ok(())
    }

    /// Switch identity scope and replace the working set with that scope's
    /// persisted copy (empty if none).
    ///
    /// Login binds `Identified(email)`; logout binds `Anonymous` again. The
    /// previous working set stays persisted under its own key - no merge.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the new scope's copy cannot be read.
    #[instrument(skip(self), fields(from = %self.scope, to = %scope))]
    pub fn bind_scope(&mut self, scope: IdentityScope) -> Result<()> {
        self.scope = scope;
        self.reload()
    }

    /// Add an item to the cart.
    ///
    /// If the product is already in the cart the incoming quantity is added
    /// to the existing line; otherwise the item is appended.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    #[instrument(skip(self, item), fields(product = %item.id, quantity = item.quantity))]
    pub fn add_item(&mut self, item: CartItem) -> Result<()> {
        let quantity = self.items.quantity_of(&item.id).saturating_add(item.quantity);
        self.items.set_quantity(&item, quantity);
        self.persist()?;
        self.notifier
            .notify(NoticeLevel::Success, &format!("{} added to cart", item.name));
        Ok(())
    }

    /// Quantity upsert: set the line for this product to exactly `quantity`.
    ///
    /// `quantity == 0` removes the line; an absent product with a positive
    /// quantity is appended.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    #[instrument(skip(self, item), fields(product = %item.id, quantity))]
    pub fn set_quantity(&mut self, item: &CartItem, quantity: u32) -> Result<()> {
        self.items.set_quantity(item, quantity);
        self.persist()
    }

    /// Increase a line's quantity by one. Absent products are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    pub fn increment(&mut self, id: &ProductId) -> Result<()> {
        if let Some(line) = self.items.get(id) {
            let item = line.clone();
            let quantity = item.quantity.saturating_add(1);
            self.items.set_quantity(&item, quantity);
            self.persist()?;
        }
        Ok(())
    }

    /// Decrease a line's quantity by one.
    ///
    /// Decrementing a quantity-1 line removes it; quantities never drop
    /// below 1 any other way. Absent products are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    pub fn decrement(&mut self, id: &ProductId) -> Result<()> {
        if let Some(line) = self.items.get(id) {
            let item = line.clone();
            let quantity = item.quantity.saturating_sub(1);
            self.items.set_quantity(&item, quantity);
            self.persist()?;
        }
        Ok(())
    }

    /// Remove a line entirely.
    ///
    /// Removing an absent product succeeds silently; the notice is only
    /// emitted when something was actually removed.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    #[instrument(skip(self), fields(product = %id))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<bool> {
        let removed = self.items.remove(id);
        if removed {
            self.persist()?;
            self.notifier
                .notify(NoticeLevel::Info, "item removed from cart");
        }
        Ok(removed)
    }

    /// Empty the cart and persist the empty state.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.persist()?;
        self.notifier.notify(NoticeLevel::Info, "cart cleared");
        Ok(())
    }

    /// Whether the cart holds a line for this product.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.contains(id)
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.items.items()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across lines; derived fresh on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.total_items()
    }

    /// Total cart price; derived fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` if persisted lines mix
    /// currencies (corrupt data; collections never mix currencies through
    /// this API).
    pub fn total_price(&self) -> Result<Price> {
        self.items
            .total_price(self.currency)
            .ok_or_else(|| StorefrontError::Validation("cart mixes currencies".to_owned()))
    }

    /// Clone of the current lines, for checkout snapshotting.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartItem> {
        self.items.items().to_vec()
    }

    fn persist(&self) -> Result<()> {
        let key = keys::cart(&self.scope);
        write_json(self.store.as_ref(), &key, &self.items)?;
        Ok(())
    }
}
