//! File-backed key-value store.
//!
//! One file per key under a root directory, mirroring the browser's local
//! storage: synchronous writes that are durable before `set` returns.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// A durable store backed by one file per key.
///
/// Keys map to `{root}/{sanitized-key}.json`. Characters outside
/// `[A-Za-z0-9._@-]` are percent-encoded so scoped keys like
/// `wishlist_a@x.com` stay readable on disk while nothing can escape the
/// root directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("empty key".to_owned()));
        }
        Ok(self.root.join(format!("{}.json", sanitize(key))))
    }
}

/// Encode a key into a safe file-name stem.
fn sanitize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-') {
            out.push(c);
        } else {
            out.push('%');
            out.push_str(&format!("{:04x}", c as u32));
        }
    }
    out
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash mid-write never leaves a torn value.
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
