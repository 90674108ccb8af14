//! Infrastructure layer: collection stores, the ledger engine, configuration.

pub mod config;
pub mod ledger;
pub mod store;


pub use config::{open_ledger, LedgerConfig, StorageBackend};
pub use ledger::{LedgerError, LedgerResult, LedgerSnapshot, StockLedger};
pub use store::{Collection, InMemoryKeyValueStore, JsonFileStore, KeyValueStore, StoreError};
