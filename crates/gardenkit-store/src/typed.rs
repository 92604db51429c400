#![forbid(unsafe_code)]

//! Typed access on top of a [`StorageBackend`].
//!
//! Every collection is addressed through a [`StorageKey<T>`] that fixes the
//! value's Rust type, so encode/decode and the failure policy live here and
//! nowhere else:
//!
//! - reads that fail or hit malformed JSON fall back to a caller default and
//!   log a warning ([`TypedStore::load_or`]);
//! - writes that fail are logged and otherwise ignored
//!   ([`TypedStore::persist`]); in-memory state stays authoritative.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{MemoryStorage, StorageBackend, StorageResult};

/// A storage key bound to the type of the value stored under it.
pub struct StorageKey<T> {
    name: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> StorageKey<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _value: PhantomData,
        }
    }

    /// The raw string key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for StorageKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone())
    }
}

impl<T> fmt::Debug for StorageKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StorageKey").field(&self.name).finish()
    }
}

impl<T> PartialEq for StorageKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for StorageKey<T> {}

/// JSON-encoding store over a shared backend.
#[derive(Clone)]
pub struct TypedStore {
    backend: Arc<dyn StorageBackend>,
}

impl TypedStore {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Create a store with memory storage (ephemeral, for testing).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Get the backend name for logging.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Shared handle to the backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Read and decode the value under `key`.
    ///
    /// `Ok(None)` when the key is absent.
    pub fn load<T: DeserializeOwned>(&self, key: &StorageKey<T>) -> StorageResult<Option<T>> {
        match self.backend.get(key.name())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read the value under `key`, substituting `fallback()` when it is
    /// missing, unreadable, or malformed.
    pub fn load_or<T: DeserializeOwned>(
        &self,
        key: &StorageKey<T>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(key = key.name(), "no stored value, using default");
                fallback()
            }
            Err(error) => {
                tracing::warn!(
                    key = key.name(),
                    backend = self.backend.name(),
                    error = %error,
                    "failed to load stored value, using default"
                );
                fallback()
            }
        }
    }

    /// Encode and write `value` under `key`.
    pub fn save<T: Serialize>(&self, key: &StorageKey<T>, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key.name(), &raw)
    }

    /// Fire-and-forget write. Returns `false` when the write failed (already
    /// logged).
    pub fn persist<T: Serialize>(&self, key: &StorageKey<T>, value: &T) -> bool {
        match self.save(key, value) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    key = key.name(),
                    backend = self.backend.name(),
                    error = %error,
                    "failed to persist value; keeping in-memory state"
                );
                false
            }
        }
    }

    /// Delete the value under `key`.
    pub fn remove<T>(&self, key: &StorageKey<T>) -> StorageResult<()> {
        self.backend.remove(key.name())
    }

    /// Fire-and-forget delete.
    pub fn discard<T>(&self, key: &StorageKey<T>) -> bool {
        match self.remove(key) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    key = key.name(),
                    backend = self.backend.name(),
                    error = %error,
                    "failed to remove stored value"
                );
                false
            }
        }
    }
}

impl fmt::Debug for TypedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}
