use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, ProductId};

/// Catalog product record.
///
/// `quantity_in_stock` is the single source of truth for on-hand stock. It is
/// unsigned, so a product can never hold negative stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    pub quantity_in_stock: u64,
    pub alert_threshold: u64,
}

/// Stock classification derived from quantity and alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// Metadata-only view of a product (everything except stock).
///
/// Editing through this type can never overwrite `quantity_in_stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub name: String,
    pub sku: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    pub alert_threshold: u64,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        sku: impl Into<String>,
        category: impl Into<String>,
        unit_price: Decimal,
        quantity_in_stock: u64,
        alert_threshold: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            unit_price,
            quantity_in_stock,
            alert_threshold,
        }
    }

    /// Build a product from metadata with an explicit opening stock.
    pub fn from_details(id: ProductId, details: ProductDetails, quantity_in_stock: u64) -> Self {
        Self {
            id,
            name: details.name,
            sku: details.sku,
            category: details.category,
            unit_price: details.unit_price,
            quantity_in_stock,
            alert_threshold: details.alert_threshold,
        }
    }

    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            name: self.name.clone(),
            sku: self.sku.clone(),
            category: self.category.clone(),
            unit_price: self.unit_price,
            alert_threshold: self.alert_threshold,
        }
    }

    /// Overwrite metadata, keeping the id and stock count.
    pub fn set_details(&mut self, details: ProductDetails) {
        self.name = details.name;
        self.sku = details.sku;
        self.category = details.category;
        self.unit_price = details.unit_price;
        self.alert_threshold = details.alert_threshold;
    }

    /// Field-level checks applied before a product enters the catalog.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::invalid_id("ProductId: cannot be blank"));
        }
        self.details().validate()
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.quantity_in_stock == 0 {
            StockStatus::OutOfStock
        } else if self.quantity_in_stock <= self.alert_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Whether the product belongs on the restock alert list.
    ///
    /// Unlike `StockStatus::LowStock` this includes out-of-stock products.
    pub fn needs_restock(&self) -> bool {
        self.quantity_in_stock <= self.alert_threshold
    }

    /// Price times stock, or `ValueOverflow` when it exceeds `Decimal::MAX`.
    pub fn inventory_value(&self) -> DomainResult<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity_in_stock))
            .ok_or_else(|| DomainError::value_overflow(self.id.as_str()))
    }
}

impl ProductDetails {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_fields("name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::invalid_fields("SKU cannot be empty"));
        }
        if self.unit_price.is_sign_negative() && !self.unit_price.is_zero() {
            return Err(DomainError::invalid_fields(format!(
                "unit price cannot be negative (got {})",
                self.unit_price
            )));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The sample catalog a fresh store is seeded with.
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product::new(
            ProductId::from("1"),
            "MacBook Pro 14\"",
            "MBP-14-M2",
            "Electronics",
            Decimal::from(1999),
            15,
            5,
        ),
        Product::new(
            ProductId::from("2"),
            "Dell UltraSharp 27\"",
            "DELL-U2723",
            "Monitors",
            Decimal::from(580),
            3,
            5,
        ),
        Product::new(
            ProductId::from("3"),
            "Logitech MX Master 3S",
            "LOGI-MX3S",
            "Peripherals",
            Decimal::from(99),
            0,
            10,
        ),
        Product::new(
            ProductId::from("4"),
            "Keychron Q1 V2",
            "KEY-Q1V2",
            "Peripherals",
            Decimal::from(170),
            8,
            5,
        ),
    ]
}
