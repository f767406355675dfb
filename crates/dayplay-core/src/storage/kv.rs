//! Opaque string key-value persistence.
//!
//! Both subsystems only ever see this trait. Values are JSON documents
//! written whole on every mutation; there is no transactional guarantee
//! across keys.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

/// Get/set-by-key string store.
pub trait KvStore {
    /// Last written value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Drop `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove` calls observed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

/// Read and decode a JSON value. A malformed document is logged and
/// treated as absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed stored value");
            Ok(None)
        }
    }
}

/// Encode `value` as JSON and overwrite `key`.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)?;
    Ok(())
}

/// Store whose reads see nothing and whose writes always fail.
#[cfg(test)]
pub(crate) struct LockedStore;

#[cfg(test)]
impl KvStore for LockedStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Locked)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn malformed_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("scores", "{not json").unwrap();
        let loaded: Option<Vec<String>> = load_json(&store, "scores").unwrap();
        assert!(loaded.is_none());
    }
}
