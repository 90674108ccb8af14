use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Durable key/value store holding whole serialized collections.
///
/// Values are read in full and rewritten in full; there are no partial updates
/// and no indexes.
///
/// ## Atomicity
///
/// `set_many` must apply every entry or none of them, and a concurrent `get`
/// must never observe a batch half-applied. The ledger relies on this to keep
/// product quantities and movement history in lockstep.
pub trait KeyValueStore: Send + Sync {
    /// Get the value for a key. Returns `None` if the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read several keys from one consistent view.
    ///
    /// The default reads keys one by one; stores that can interleave with a
    /// writer should override it.
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Write several keys as one atomic batch.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError>;

    /// Write a single key.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.set_many(&[(key, value)])
    }
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        (**self).get_many(keys)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        (**self).set_many(entries)
    }
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        (**self).get_many(keys)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        (**self).set_many(entries)
    }
}

/// Key/value store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two persisted collections.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Movements,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Products, Collection::Movements];

    /// Storage key of the collection.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Products => "inventory_pro_products",
            Collection::Movements => "inventory_pro_movements",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Serialize a collection into the value stored under its key.
pub fn encode_collection<T: Serialize>(
    collection: Collection,
    records: &[T],
) -> Result<String, StoreError> {
    serde_json::to_string(records)
        .map_err(|e| StoreError::Serialization(format!("{collection}: {e}")))
}

/// Parse a stored collection value back into records.
pub fn decode_collection<T: DeserializeOwned>(
    collection: Collection,
    raw: &str,
) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Serialization(format!("{collection}: {e}")))
}
