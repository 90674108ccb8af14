//! Stock ledger engine (application-level orchestration).
//!
//! Composes a [`KeyValueStore`] with the pure inventory domain:
//!
//! ```text
//! MovementRequest
//!   ↓
//! 1. Load catalog + history (full collections)
//!   ↓
//! 2. Product::handle (pure decision: bounds, snapshot of product name)
//!   ↓
//! 3. Product::apply + prepend movement (newest-first)
//!   ↓
//! 4. Commit both collections in one atomic store batch
//! ```
//!
//! Mutations are serialized behind a single engine lock, so the
//! read-modify-write of a product's stock can't interleave with another
//! movement. A rejected or failed operation writes nothing.

use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use stockledger_core::{upsert_by_id, Aggregate, DomainError, MovementId, ProductId};
use stockledger_inventory::{
    default_catalog, recent, restock_alerts, Movement, MovementRequest, Product, ProductDetails,
    ProductQuery, RecordMovement, StockStats,
};

use crate::store::{decode_collection, encode_collection, Collection, KeyValueStore, StoreError};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger operation error.
///
/// Domain failures (`ProductNotFound`, `InsufficientStock`, ...) pass through
/// unchanged so callers can show them verbatim.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("corrupt collection {collection}: {message}")]
    CorruptCollection {
        collection: Collection,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Stable kind tag for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Domain(e) => e.code(),
            LedgerError::CorruptCollection { .. } => "corrupt_collection",
            LedgerError::Store(_) => "storage",
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            LedgerError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Catalog and history read from one consistent store view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub products: Vec<Product>,
    pub movements: Vec<Movement>,
}

/// The ledger engine: catalog + movement history over an explicit store handle.
#[derive(Debug)]
pub struct StockLedger<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S> StockLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> StockLedger<S>
where
    S: KeyValueStore,
{
    /// Construct and seed the default catalog if the store is empty.
    pub fn open(store: S) -> LedgerResult<Self> {
        let ledger = Self::new(store);
        ledger.init()?;
        Ok(ledger)
    }

    /// Seed the default catalog and an empty history where absent.
    pub fn init(&self) -> LedgerResult<()> {
        self.init_with(default_catalog())
    }

    /// Seed `catalog` and an empty history where absent.
    ///
    /// Existing collections are never overwritten.
    pub fn init_with(&self, catalog: Vec<Product>) -> LedgerResult<()> {
        let _guard = self.lock()?;

        let mut batch = Vec::new();
        if self.store.get(Collection::Products.key())?.is_none() {
            for p in &catalog {
                p.validate()?;
            }
            batch.push((Collection::Products, encode_collection(Collection::Products, &catalog)?));
        }
        if self.store.get(Collection::Movements.key())?.is_none() {
            let empty: Vec<Movement> = Vec::new();
            batch.push((Collection::Movements, encode_collection(Collection::Movements, &empty)?));
        }

        if batch.is_empty() {
            tracing::debug!("ledger collections already present; nothing to seed");
            return Ok(());
        }

        let seeded: Vec<&str> = batch.iter().map(|(c, _)| c.key()).collect();
        tracing::info!("seeding ledger collections: {seeded:?}");
        self.commit(batch)
    }

    /// Full catalog in storage order.
    pub fn list_products(&self) -> LedgerResult<Vec<Product>> {
        self.load(Collection::Products)
    }

    pub fn get_product(&self, id: &ProductId) -> LedgerResult<Option<Product>> {
        Ok(self.list_products()?.into_iter().find(|p| &p.id == id))
    }

    /// Replace the product with the same id, or append it.
    ///
    /// This is a full overwrite, stock included. Use
    /// [`StockLedger::update_product_details`] to edit metadata only.
    pub fn upsert_product(&self, product: Product) -> LedgerResult<()> {
        product.validate()?;

        let _guard = self.lock()?;
        let mut products: Vec<Product> = self.load(Collection::Products)?;
        let id = product.id.clone();
        let replaced = upsert_by_id(&mut products, product);
        self.save(Collection::Products, &products)?;

        if replaced {
            tracing::info!(product_id = %id, "product replaced");
        } else {
            tracing::info!(product_id = %id, "product added");
        }
        Ok(())
    }

    /// Edit a product's metadata, preserving its stock count.
    pub fn update_product_details(
        &self,
        id: &ProductId,
        details: ProductDetails,
    ) -> LedgerResult<Product> {
        details.validate()?;

        let _guard = self.lock()?;
        let mut products: Vec<Product> = self.load(Collection::Products)?;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::product_not_found(id.as_str()))?;
        product.set_details(details);
        let updated = product.clone();
        self.save(Collection::Products, &products)?;

        tracing::info!(product_id = %id, "product details updated");
        Ok(updated)
    }

    /// Remove a product. History is left untouched.
    ///
    /// Returns whether a product was removed; a missing id is a no-op.
    pub fn delete_product(&self, id: &ProductId) -> LedgerResult<bool> {
        let _guard = self.lock()?;
        let mut products: Vec<Product> = self.load(Collection::Products)?;
        let before = products.len();
        products.retain(|p| &p.id != id);

        if products.len() == before {
            tracing::debug!(product_id = %id, "delete of unknown product ignored");
            return Ok(false);
        }

        self.save(Collection::Products, &products)?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(true)
    }

    /// Record an entry/exit: adjust stock and prepend history atomically.
    pub fn record_movement(&self, request: MovementRequest) -> LedgerResult<Movement> {
        let _guard = self.lock()?;

        let mut products: Vec<Product> = self.load(Collection::Products)?;
        let Some(idx) = products.iter().position(|p| p.id == request.product_id) else {
            tracing::warn!(product_id = %request.product_id, "movement rejected: product not found");
            return Err(DomainError::product_not_found(request.product_id.as_str()).into());
        };

        let command = RecordMovement::new(MovementId::generate(), request);
        let movement = match products[idx].handle(&command) {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(
                    product_id = %command.request.product_id,
                    kind = %command.request.kind,
                    quantity = command.request.quantity,
                    "movement rejected: {err}"
                );
                return Err(err.into());
            }
        };
        products[idx].apply(&movement);

        let mut movements: Vec<Movement> = self.load(Collection::Movements)?;
        movements.insert(0, movement.clone());

        self.commit(vec![
            (Collection::Products, encode_collection(Collection::Products, &products)?),
            (Collection::Movements, encode_collection(Collection::Movements, &movements)?),
        ])?;

        tracing::info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            kind = %movement.kind,
            quantity = movement.quantity,
            stock = products[idx].quantity_in_stock,
            "movement recorded"
        );
        Ok(movement)
    }

    /// Full history, newest first.
    pub fn list_movements(&self) -> LedgerResult<Vec<Movement>> {
        self.load(Collection::Movements)
    }

    /// Both collections from a single store read, for callers that must see
    /// stock and history in agreement.
    pub fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        let keys = [Collection::Products.key(), Collection::Movements.key()];
        let mut raw = self.store.get_many(&keys)?.into_iter();
        let products = self.decode(Collection::Products, raw.next().flatten())?;
        let movements = self.decode(Collection::Movements, raw.next().flatten())?;
        Ok(LedgerSnapshot {
            products,
            movements,
        })
    }

    /// The `limit` newest movements.
    pub fn recent_movements(&self, limit: usize) -> LedgerResult<Vec<Movement>> {
        Ok(recent(&self.list_movements()?, limit))
    }

    pub fn compute_stats(&self) -> LedgerResult<StockStats> {
        Ok(StockStats::compute(&self.list_products()?)?)
    }

    /// Products at or below their alert threshold (out-of-stock included).
    pub fn restock_alerts(&self) -> LedgerResult<Vec<Product>> {
        Ok(restock_alerts(&self.list_products()?))
    }

    /// Search + sort over the current catalog.
    pub fn query_products(&self, query: &ProductQuery) -> LedgerResult<Vec<Product>> {
        Ok(query.apply(&self.list_products()?))
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Storage("ledger lock poisoned".to_string()).into())
    }

    fn load<T: DeserializeOwned>(&self, collection: Collection) -> LedgerResult<Vec<T>> {
        let raw = self.store.get(collection.key())?;
        self.decode(collection, raw)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        collection: Collection,
        raw: Option<String>,
    ) -> LedgerResult<Vec<T>> {
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        decode_collection(collection, &raw).map_err(|e| {
            tracing::error!("failed to decode {collection}: {e}");
            LedgerError::CorruptCollection {
                collection,
                message: e.to_string(),
            }
        })
    }

    fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> LedgerResult<()> {
        self.commit(vec![(collection, encode_collection(collection, records)?)])
    }

    fn commit(&self, batch: Vec<(Collection, String)>) -> LedgerResult<()> {
        let entries: Vec<(&str, String)> = batch.into_iter().map(|(c, v)| (c.key(), v)).collect();
        self.store.set_many(&entries).map_err(|e| {
            tracing::error!("ledger commit failed: {e}");
            LedgerError::from(e)
        })?;
        tracing::debug!(keys = entries.len(), "ledger batch committed");
        Ok(())
    }
}
