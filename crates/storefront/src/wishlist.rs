//! Wishlist container.
//!
//! Same container pattern as the cart - pure engine plus scoped persistence -
//! with wishlist add semantics: a duplicate product is strictly rejected as
//! a no-op with an "already in your wishlist" notice, and quantities do not
//! exist (every entry counts once).

use std::sync::Arc;

use tracing::instrument;

use essenza_core::{Collection, ProductId, WishlistItem};

use crate::error::Result;
use crate::identity::IdentityScope;
use crate::notify::{NoticeLevel, Notifier};
use crate::store::{KeyValueStore, keys, read_json, write_json};

/// Programmatic outcome of a wishlist add.
///
/// The notice channel stays the user-facing signal; this is the structured
/// one, so callers no longer have to read notification text to distinguish
/// "added" from "already there".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item was appended and persisted.
    Added,
    /// The product was already present; nothing changed.
    AlreadyPresent,
}

/// Identity-scoped wishlist.
pub struct WishlistContainer {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    scope: IdentityScope,
    items: Collection<WishlistItem>,
}

impl WishlistContainer {
    /// Create a wishlist bound to the anonymous scope, loading any persisted
    /// guest wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the persisted copy cannot be read.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let mut wishlist = Self {
            store,
            notifier,
            scope: IdentityScope::Anonymous,
            items: Collection::new(),
        };
        wishlist.reload()?;
        Ok(wishlist)
    }

    /// The identity scope this wishlist is bound to.
    #[must_use]
    pub const fn scope(&self) -> &IdentityScope {
        &self.scope
    }

    /// Re-read the scoped key and replace the working set.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` on read or parse failure.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub fn reload(&mut self) -> Result<()> {
        let key = keys::wishlist(&self.scope);
        let items: Vec<WishlistItem> = read_json(self.store.as_ref(), &key)?.unwrap_or_default();
        self.items.load(items);
        Ok(())
    }

    /// Switch identity scope and replace the working set with that scope's
    /// persisted copy (empty if none). Never merges.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the new scope's copy cannot be read.
    #[instrument(skip(self), fields(from = %self.scope, to = %scope))]
    pub fn bind_scope(&mut self, scope: IdentityScope) -> Result<()> {
        self.scope = scope;
        self.reload()
    }

    /// Add an item, rejecting duplicates.
    ///
    /// A duplicate product leaves the collection untouched and surfaces an
    /// "already in your wishlist" notice.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    #[instrument(skip(self, item), fields(product = %item.id))]
    pub fn add_item(&mut self, item: WishlistItem) -> Result<AddOutcome> {
        let name = item.name.clone();
        if !self.items.insert(item) {
            self.notifier
                .notify(NoticeLevel::Warning, &format!("{name} is already in your wishlist"));
            return Ok(AddOutcome::AlreadyPresent);
        }
        self.persist()?;
        self.notifier
            .notify(NoticeLevel::Success, &format!("{name} added to wishlist"));
        Ok(AddOutcome::Added)
    }

    /// Remove an entry.
    ///
    /// Removing an absent product succeeds silently; the "removed" notice is
    /// only emitted when an entry was actually removed.
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
                .notify(NoticeLevel::Info, "removed from wishlist");
        }
        Ok(removed)
    }

    /// Empty the wishlist and persist the empty state.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if persisting fails.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.persist()?;
        self.notifier.notify(NoticeLevel::Info, "wishlist cleared");
        Ok(())
    }

    /// Pure lookup; no side effects.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.contains(id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        self.items.items()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let key = keys::wishlist(&self.scope);
        write_json(self.store.as_ref(), &key, &self.items)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use essenza_core::{CurrencyCode, Email, Price};

    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;

    fn item(id: &str) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: format!("Perfume {id}"),
            category: "citrus".to_owned(),
            price: Price::from_major(45, CurrencyCode::USD),
            image_url: String::new(),
            in_stock: true,
        }
    }

    fn wishlist() -> (WishlistContainer, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let container =
            WishlistContainer::new(Arc::new(MemoryStore::new()), notifier.clone()).unwrap();
        (container, notifier)
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let (mut wishlist, notifier) = wishlist();

        assert_eq!(wishlist.add_item(item("p1")).unwrap(), AddOutcome::Added);
        let before: Vec<_> = wishlist.items().to_vec();

        assert_eq!(
            wishlist.add_item(item("p1")).unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(wishlist.items(), &before[..]);
        assert!(
            notifier
                .messages()
                .iter()
                .any(|m| m.contains("already in your wishlist"))
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut wishlist, notifier) = wishlist();
        wishlist.add_item(item("p1")).unwrap();

        assert!(wishlist.remove_item(&ProductId::new("p1")).unwrap());
        assert!(!wishlist.remove_item(&ProductId::new("p1")).unwrap());
        assert!(wishlist.is_empty());

        // exactly one "removed" notice for two calls
        let removed_notices = notifier
            .messages()
            .iter()
            .filter(|m| m.contains("removed"))
            .count();
        assert_eq!(removed_notices, 1);
    }

    #[test]
    fn test_identity_isolation() {
        let (mut wishlist, _notifier) = wishlist();

        let alice = IdentityScope::Identified(Email::parse("a@x.com").unwrap());
        wishlist.bind_scope(alice.clone()).unwrap();
        wishlist.add_item(item("alice-only")).unwrap();

        let bob = IdentityScope::Identified(Email::parse("b@x.com").unwrap());
        wishlist.bind_scope(bob).unwrap();
        assert!(!wishlist.contains(&ProductId::new("alice-only")));

        wishlist.bind_scope(IdentityScope::Anonymous).unwrap();
        assert!(!wishlist.contains(&ProductId::new("alice-only")));

        // alice's copy is still there when she logs back in
        wishlist.bind_scope(alice).unwrap();
        assert!(wishlist.contains(&ProductId::new("alice-only")));
    }

    #[test]
    fn test_clear_persists_empty_state() {
        let store = Arc::new(MemoryStore::new());
        let mut wishlist =
            WishlistContainer::new(store.clone(), Arc::new(RecordingNotifier::new())).unwrap();
        wishlist.add_item(item("p1")).unwrap();
        wishlist.clear().unwrap();

        let reopened =
            WishlistContainer::new(store, Arc::new(RecordingNotifier::new())).unwrap();
        assert!(reopened.is_empty());
    }
}
