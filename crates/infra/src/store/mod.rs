//! Collection persistence boundary.
//!
//! The ledger stores two independently serialized collections (catalog and
//! movement history) in a key/value store, without making assumptions about
//! the backing medium.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::JsonFileStore;
pub use in_memory::InMemoryKeyValueStore;
pub use r#trait::{decode_collection, encode_collection, Collection, KeyValueStore, StoreError};
