use std::collections::HashMap;
use std::sync::RwLock;

use super::r#trait::{KeyValueStore, StoreError};

/// In-memory key/value store.
///
/// Intended for tests/dev: every ledger instance gets its own isolated store.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    fn set_many(&self, batch: &[(&str, String)]) -> Result<(), StoreError> {
        // One write guard for the whole batch: readers see all of it or none.
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        for (key, value) in batch {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("absent").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn batch_writes_every_key() {
        let store = InMemoryKeyValueStore::new();
        store
            .set_many(&[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn set_overwrites_in_full() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "[1,2,3]".to_string()).unwrap();
        store.set("k", "[]".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));
    }
}
