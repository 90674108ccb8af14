//! Ledger configuration loading.
//!
//! | variable | values | default |
//! |---|---|---|
//! | `STOCKLEDGER_STORE` | `memory`, `file` | `memory` |
//! | `STOCKLEDGER_DATA_PATH` | file path | `stockledger.json` |
//! | `STOCKLEDGER_SEED_DEFAULTS` | `true`, `false` | `true` |

use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::ledger::StockLedger;
use crate::store::{InMemoryKeyValueStore, JsonFileStore, KeyValueStore};

pub const ENV_STORE: &str = "STOCKLEDGER_STORE";
pub const ENV_DATA_PATH: &str = "STOCKLEDGER_DATA_PATH";
pub const ENV_SEED_DEFAULTS: &str = "STOCKLEDGER_SEED_DEFAULTS";

const DEFAULT_DATA_PATH: &str = "stockledger.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub backend: StorageBackend,
    /// Seed the sample catalog into an empty store (otherwise start empty).
    pub seed_defaults: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            seed_defaults: true,
        }
    }
}

impl LedgerConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::File(path.into()),
            seed_defaults: true,
        }
    }

    pub fn with_seed_defaults(mut self, seed: bool) -> Self {
        self.seed_defaults = seed;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_path = lookup(ENV_DATA_PATH).unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

        let backend = match lookup(ENV_STORE).as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StorageBackend::InMemory,
            Some("file") => StorageBackend::File(PathBuf::from(data_path)),
            Some(other) => bail!("{ENV_STORE}: unknown backend '{other}' (expected memory|file)"),
        };

        let seed_defaults = match lookup(ENV_SEED_DEFAULTS) {
            None => true,
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("{ENV_SEED_DEFAULTS}: expected true|false, got '{raw}'"))?,
        };

        Ok(Self {
            backend,
            seed_defaults,
        })
    }
}

/// Build the configured store and seed it.
pub fn open_ledger(config: &LedgerConfig) -> anyhow::Result<StockLedger<Box<dyn KeyValueStore>>> {
    let store: Box<dyn KeyValueStore> = match &config.backend {
        StorageBackend::InMemory => Box::new(InMemoryKeyValueStore::new()),
        StorageBackend::File(path) => Box::new(
            JsonFileStore::open(path)
                .with_context(|| format!("failed to open ledger store at {}", path.display()))?,
        ),
    };

    let ledger = StockLedger::new(store);
    let seeded = if config.seed_defaults {
        ledger.init()
    } else {
        ledger.init_with(Vec::new())
    };
    seeded.context("failed to initialize ledger collections")?;

    tracing::info!(backend = ?config.backend, seed_defaults = config.seed_defaults, "ledger opened");
    Ok(ledger)
}
