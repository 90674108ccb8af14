//! `stockledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::Aggregate;
pub use entity::{upsert_by_id, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{MovementId, ProductId};
