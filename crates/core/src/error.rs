//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic ledger failures (missing products, stock
/// bounds, malformed input). Storage concerns belong to the infra crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A movement referenced a product that is not in the catalog.
    #[error("product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// An exit movement asked for more units than are on hand.
    #[error(
        "insufficient stock for this exit movement (product {product_id}: requested {requested}, available {available})"
    )]
    InsufficientStock {
        product_id: String,
        requested: u64,
        available: u64,
    },

    /// Movement quantity is zero or would overflow the stock counter.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u64),

    /// A product carried out-of-range or blank fields.
    #[error("invalid product fields: {0}")]
    InvalidProductFields(String),

    /// An identifier was invalid (e.g. blank).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Price times stock no longer fits in a decimal amount.
    #[error("inventory value overflow for product {product_id}")]
    ValueOverflow { product_id: String },
}

impl DomainError {
    pub fn product_not_found(product_id: impl Into<String>) -> Self {
        Self::ProductNotFound {
            product_id: product_id.into(),
        }
    }

    pub fn insufficient_stock(product_id: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            product_id: product_id.into(),
            requested,
            available,
        }
    }

    pub fn invalid_quantity(quantity: u64) -> Self {
        Self::InvalidQuantity(quantity)
    }

    pub fn invalid_fields(msg: impl Into<String>) -> Self {
        Self::InvalidProductFields(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn value_overflow(product_id: impl Into<String>) -> Self {
        Self::ValueOverflow {
            product_id: product_id.into(),
        }
    }

    /// Stable machine-readable kind tag, suitable for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ProductNotFound { .. } => "product_not_found",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::InvalidQuantity(_) => "invalid_quantity",
            DomainError::InvalidProductFields(_) => "invalid_product_fields",
            DomainError::InvalidId(_) => "invalid_id",
            DomainError::ValueOverflow { .. } => "value_overflow",
        }
    }
}
