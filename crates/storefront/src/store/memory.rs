//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, StoreError};

/// A process-local, non-durable store.
///
/// The default backend for tests and short-lived embedders. Lock poisoning
/// is surfaced as an I/O error rather than a panic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently present.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read_entries()?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read_entries()?.is_empty())
    }

    fn read_entries(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries.read().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(std::io::Error::other("store lock poisoned"))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}
