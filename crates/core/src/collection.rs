//! The pure line-item collection engine.
//!
//! A [`Collection`] is an ordered sequence of line items, unique by product
//! ID, with insertion-order iteration. It is the state half of the cart and
//! wishlist containers: every operation is a pure in-memory transition with
//! no I/O and no failure path. Validation belongs to the container boundary;
//! the engine accepts whatever shapes it is given.
//!
//! Totals (`total_items`, `total_price`) are derived on every call and never
//! cached, so they can't go stale across mutations.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::types::{CartItem, CurrencyCode, LineItem, Price, ProductId};

/// An ordered, id-unique collection of line items.
///
/// Insertion order is preserved; removing and re-adding an item moves it to
/// the end. Duplicate IDs cannot exist: [`Collection::insert`] refuses them
/// and the cart upsert replaces in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: LineItem> Collection<T> {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Replace the entire collection wholesale, preserving the given order.
    ///
    /// Used once per identity-scope activation when loading the persisted
    /// copy. No validation beyond structural shape.
    pub fn load(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Append an item iff its ID is not already present.
    ///
    /// Returns `false` (collection unchanged) on a duplicate ID. The caller
    /// decides whether a duplicate is worth telling the user about.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the entry with the matching ID.
    ///
    /// Returns `false` if no entry matched; removal of an absent ID is a
    /// no-op, not an error.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether an entry with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// The entry with this ID, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The entries as a slice, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count: the sum of line quantities.
    ///
    /// Recomputed on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    /// Total price: the sum of unit price times quantity per line.
    ///
    /// Recomputed on every call. An empty collection totals zero in the
    /// given currency; a currency mismatch between lines (corrupt data)
    /// yields `None`.
    #[must_use]
    pub fn total_price(&self, currency: CurrencyCode) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::zero(currency), |acc, item| {
                acc.checked_add(&item.unit_price().mul_quantity(item.quantity()))
            })
    }
}

impl<'a, T: LineItem> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Collection<CartItem> {
    /// Quantity upsert for cart lines.
    ///
    /// - `quantity == 0`: removes the line (if present).
    /// - absent ID, `quantity > 0`: appends the item with that quantity.
    /// - present ID: replaces the line's quantity in place.
    pub fn set_quantity(&mut self, item: &CartItem, quantity: u32) {
        if quantity == 0 {
            self.remove(&item.id);
            return;
        }
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = quantity,
            None => self.items.push(item.with_quantity(quantity)),
        }
    }

    /// Current quantity of a line, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.get(id).map_or(0, |line| line.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{CartItem, Price, ProductId, WishlistItem};

    fn cart_item(id: &str, price_minor: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Perfume {id}"),
            category: "woody".to_owned(),
            price: Price::from_minor(price_minor, CurrencyCode::USD),
            quantity,
            image_url: format!("https://img.example.com/{id}.jpg"),
        }
    }

    fn wish_item(id: &str) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: format!("Perfume {id}"),
            category: "floral".to_owned(),
            price: Price::from_major(30, CurrencyCode::USD),
            image_url: format!("https://img.example.com/{id}.jpg"),
            in_stock: true,
        }
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut wishlist = Collection::new();
        assert!(wishlist.insert(wish_item("p1")));
        let snapshot = wishlist.clone();
        assert!(!wishlist.insert(wish_item("p1")));
        assert_eq!(wishlist, snapshot);
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut wishlist = Collection::new();
        wishlist.insert(wish_item("p1"));
        assert!(!wishlist.remove(&ProductId::new("missing")));
        assert!(wishlist.remove(&ProductId::new("p1")));
        assert!(!wishlist.remove(&ProductId::new("p1")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_remove_from_empty_is_noop() {
        let mut cart: Collection<CartItem> = Collection::new();
        assert!(!cart.remove(&ProductId::new("p1")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_upsert() {
        let mut cart = Collection::new();
        let item = cart_item("p1", 1000, 1);

        // absent id + positive quantity appends
        cart.set_quantity(&item, 3);
        assert_eq!(cart.quantity_of(&item.id), 3);
        assert_eq!(cart.len(), 1);

        // present id replaces quantity
        cart.set_quantity(&item, 5);
        assert_eq!(cart.quantity_of(&item.id), 5);
        assert_eq!(cart.len(), 1);

        // zero removes
        cart.set_quantity(&item, 0);
        assert!(!cart.contains(&item.id));
    }

    #[test]
    fn test_totals_recomputed_after_every_mutation() {
        let mut cart = Collection::new();
        let p1 = cart_item("p1", 1000, 1);

        cart.insert(p1.clone());
        assert_eq!(cart.total_items(), 1);
        assert_eq!(
            cart.total_price(CurrencyCode::USD).unwrap().amount,
            Decimal::new(1000, 2)
        );

        cart.set_quantity(&p1, 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(
            cart.total_price(CurrencyCode::USD).unwrap().amount,
            Decimal::new(2000, 2)
        );

        cart.remove(&p1.id);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(
            cart.total_price(CurrencyCode::USD).unwrap().amount,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_totals_across_lines() {
        let mut cart = Collection::new();
        cart.insert(cart_item("p1", 1250, 2));
        cart.insert(cart_item("p2", 500, 3));
        assert_eq!(cart.total_items(), 5);
        assert_eq!(
            cart.total_price(CurrencyCode::USD).unwrap().amount,
            Decimal::new(4000, 2)
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut wishlist = Collection::new();
        for id in ["b", "a", "c"] {
            wishlist.insert(wish_item(id));
        }
        let order: Vec<_> = wishlist.iter().map(|i| i.id.as_str().to_owned()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut cart = Collection::new();
        cart.insert(cart_item("old", 100, 1));
        cart.load(vec![cart_item("p1", 1000, 2), cart_item("p2", 500, 1)]);
        assert!(!cart.contains(&ProductId::new("old")));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_serde_round_trip_preserves_order_and_fields() {
        let mut cart = Collection::new();
        cart.insert(cart_item("p2", 500, 4));
        cart.insert(cart_item("p1", 1000, 1));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Collection<CartItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
