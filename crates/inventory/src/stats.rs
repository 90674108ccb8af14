use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult};

use crate::product::{Product, StockStatus};

/// Aggregate catalog statistics, recomputed from a snapshot on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStats {
    pub total_products: usize,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_inventory_value: Decimal,
}

impl StockStats {
    /// Fails with `ValueOverflow` when a product's value or the running total
    /// exceeds `Decimal::MAX`.
    pub fn compute(products: &[Product]) -> DomainResult<Self> {
        let mut stats = StockStats {
            total_products: products.len(),
            low_stock_items: 0,
            out_of_stock_items: 0,
            total_inventory_value: Decimal::ZERO,
        };

        for p in products {
            match p.stock_status() {
                StockStatus::OutOfStock => stats.out_of_stock_items += 1,
                StockStatus::LowStock => stats.low_stock_items += 1,
                StockStatus::InStock => {}
            }
            stats.total_inventory_value = stats
                .total_inventory_value
                .checked_add(p.inventory_value()?)
                .ok_or_else(|| DomainError::value_overflow(p.id.as_str()))?;
        }

        Ok(stats)
    }
}
