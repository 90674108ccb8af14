//! Stock ledger domain module.
//!
//! This crate contains the business rules for the catalog and its movement
//! history, implemented purely as deterministic domain logic (no IO, no storage).

pub mod movement;
pub mod product;
pub mod query;
pub mod stats;

pub use movement::{Movement, MovementRequest, MovementType, RecordMovement};
pub use product::{default_catalog, Product, ProductDetails, StockStatus};
pub use query::{
    recent, restock_alerts, ProductQuery, ProductSort, SortKey, SortOrder, RECENT_MOVEMENTS,
};
pub use stats::StockStats;
