//! Line-item types for the cart and wishlist collections.
//!
//! Both item shapes snapshot their descriptive fields (name, price,
//! availability) at add-time. Nothing here is re-fetched on render; the
//! collection engine treats the snapshot as the line's fixed state.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A line item within an ordered, id-unique collection.
///
/// Identity is the product ID alone; descriptive fields never participate in
/// equality or lookup. The default quantity of 1 covers quantity-less
/// collections (wishlist).
pub trait LineItem: Clone {
    /// Stable product reference, unique within a collection.
    fn id(&self) -> &ProductId;

    /// Unit price snapshotted at add-time.
    fn unit_price(&self) -> Price;

    /// Line quantity; 1 for collections without quantities.
    fn quantity(&self) -> u32 {
        1
    }
}

/// A cart line: product snapshot plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Stable product reference.
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Brand or fragrance family; descriptive only.
    pub category: String,
    /// Unit price snapshotted when the item was added.
    pub price: Price,
    /// Line quantity, kept >= 1 by the collection engine.
    pub quantity: u32,
    /// Presentation image reference; opaque, unvalidated.
    pub image_url: String,
}

impl CartItem {
    /// Copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self { quantity, ..self.clone() }
    }
}

impl LineItem for CartItem {
    fn id(&self) -> &ProductId {
        &self.id
    }

    fn unit_price(&self) -> Price {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A wishlist entry: product snapshot plus an availability flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Stable product reference.
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Brand or fragrance family; descriptive only.
    pub category: String,
    /// Unit price snapshotted when the item was added.
    pub price: Price,
    /// Presentation image reference; opaque, unvalidated.
    pub image_url: String,
    /// In-stock state at add-time; never refreshed.
    pub in_stock: bool,
}

impl LineItem for WishlistItem {
    fn id(&self) -> &ProductId {
        &self.id
    }

    fn unit_price(&self) -> Price {
        self.price
    }
}
