//! Persisted key-value storage for the storefront state layer.
//!
//! The storefront treats a durable string key -> string value map as its
//! stand-in database. All key names are derived in [`keys`] - nowhere else -
//! and every value is a JSON document parsed and validated at this boundary
//! via [`read_json`] / [`write_json`]. Containers and services never touch
//! raw strings or re-derive key names ad hoc.
//!
//! # Key layout
//!
//! | Key pattern        | Contents                                   |
//! |--------------------|--------------------------------------------|
//! | `perfume_user`     | current identified user's profile record   |
//! | `perfume_users`    | registered-user directory                  |
//! | `perfume_orders`   | global list of order records               |
//! | `cart_{scope}`     | scoped cart collection                     |
//! | `wishlist_{scope}` | scoped wishlist collection                 |
//! | `token`, `user`    | auth-session mirror of `perfume_user`      |
//!
//! There are no transactions, no cross-key atomicity, and no change
//! notifications; a second process mutating the same key races with
//! last-write-wins semantics (accepted single-tab assumption).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the persisted store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage I/O failed.
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value failed to parse as its expected shape.
    #[error("corrupt value under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value failed to serialize (should not happen for our record types).
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key is not usable by this backend.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// A durable string key -> string value map.
///
/// `set` is durable before it returns (synchronous semantics); `get` after a
/// completed `set` of the same key observes that write. No expiry, no
/// transactions, no subscriptions.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Durably write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value under `key`; absent keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to remove.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and parse the JSON document under `key`.
///
/// Returns `Ok(None)` for an absent key. A present-but-malformed value is
/// `StoreError::Corrupt` - the store boundary is the one place shape is
/// checked.
///
/// # Errors
///
/// Returns `StoreError::Io` on backend failure and `StoreError::Corrupt` on
/// parse failure.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_owned(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serialize `value` and durably write it under `key`.
///
/// # Errors
///
/// Returns `StoreError::Encode` on serialization failure and
/// `StoreError::Io` on backend failure.
pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)
}

/// The single place storage key names are derived.
pub mod keys {
    use crate::identity::IdentityScope;

    /// Current identified user's profile record.
    pub const CURRENT_USER: &str = "perfume_user";

    /// Registered-user directory.
    pub const USERS: &str = "perfume_users";

    /// Global (not per-user) list of order records.
    pub const ORDERS: &str = "perfume_orders";

    /// Auth-session token mirror.
    pub const TOKEN: &str = "token";

    /// Auth-session profile mirror of [`CURRENT_USER`].
    pub const SESSION_USER: &str = "user";

    /// Scoped cart collection key.
    #[must_use]
    pub fn cart(scope: &IdentityScope) -> String {
        format!("cart_{}", scope.storage_suffix())
    }

    /// Scoped wishlist collection key.
    #[must_use]
    pub fn wishlist(scope: &IdentityScope) -> String {
        format!("wishlist_{}", scope.storage_suffix())
    }
}
