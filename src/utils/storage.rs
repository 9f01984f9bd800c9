//! Key-value persistence for the history logs.
//!
//! The shell only needs string values under fixed keys. In the browser this is
//! `localStorage` (see `web::LocalStorage`); elsewhere [`MemoryStorage`] keeps
//! the values for the lifetime of the process.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::core::error::StorageError;

/// Durable string key-value store.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load a JSON value from storage.
///
/// Returns `None` if the key doesn't exist or deserialization fails.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let json = storage.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding unreadable '{}' snapshot: {}", key, e);
            None
        }
    }
}

/// Store a value as JSON.
pub fn save<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_save_and_load_json() {
        let storage = MemoryStorage::new();
        save(&storage, "list", &vec!["a", "b"]).unwrap();
        let loaded: Option<Vec<String>> = load(&storage, "list");
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_load_corrupt_value() {
        let storage = MemoryStorage::new();
        storage.set("list", "{not json").unwrap();
        let loaded: Option<Vec<String>> = load(&storage, "list");
        assert!(loaded.is_none());
    }
}
