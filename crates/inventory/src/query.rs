//! Catalog queries: search, typed sorting, restock alerts, recent history.
//!
//! Sorting is an explicit key enum mapped to typed comparators rather than
//! field lookup by name.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::movement::Movement;
use crate::product::Product;

/// Number of movements the overview shows.
pub const RECENT_MOVEMENTS: usize = 5;

/// Sortable product columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Sku,
    Name,
    Category,
    UnitPrice,
    QuantityInStock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

type Comparator = fn(&Product, &Product) -> Ordering;

fn by_sku(a: &Product, b: &Product) -> Ordering {
    a.sku.cmp(&b.sku)
}

fn by_name(a: &Product, b: &Product) -> Ordering {
    a.name.cmp(&b.name)
}

fn by_category(a: &Product, b: &Product) -> Ordering {
    a.category.cmp(&b.category)
}

fn by_unit_price(a: &Product, b: &Product) -> Ordering {
    a.unit_price.cmp(&b.unit_price)
}

fn by_quantity(a: &Product, b: &Product) -> Ordering {
    a.quantity_in_stock.cmp(&b.quantity_in_stock)
}

impl SortKey {
    pub fn comparator(self) -> Comparator {
        match self {
            SortKey::Sku => by_sku,
            SortKey::Name => by_name,
            SortKey::Category => by_category,
            SortKey::UnitPrice => by_unit_price,
            SortKey::QuantityInStock => by_quantity,
        }
    }
}

/// Active sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for ProductSort {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            order: SortOrder::Asc,
        }
    }
}

impl ProductSort {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Column-header behavior: re-selecting the active key flips the order,
    /// selecting another key sorts it ascending.
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                order: self.order.toggled(),
            }
        } else {
            Self {
                key,
                order: SortOrder::Asc,
            }
        }
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ord = (self.key.comparator())(a, b);
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Search + sort over a catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn sort_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = ProductSort::new(key, order);
        self
    }

    /// Case-insensitive substring match on name, SKU or category.
    pub fn matches(&self, product: &Product) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&product.name, &product.sku, &product.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Filter then stable-sort a snapshot.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut result: Vec<Product> = products.iter().filter(|p| self.matches(p)).cloned().collect();
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

/// Products at or below their alert threshold, in catalog order.
pub fn restock_alerts(products: &[Product]) -> Vec<Product> {
    products.iter().filter(|p| p.needs_restock()).cloned().collect()
}

/// The `limit` newest movements of a newest-first history.
pub fn recent(movements: &[Movement], limit: usize) -> Vec<Movement> {
    movements.iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{MovementRequest, MovementType};
    use crate::product::default_catalog;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use stockledger_core::{MovementId, ProductId};

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_by_name_ascending() {
        let result = ProductQuery::new().apply(&default_catalog());
        assert_eq!(
            names(&result),
            vec![
                "Dell UltraSharp 27\"",
                "Keychron Q1 V2",
                "Logitech MX Master 3S",
                "MacBook Pro 14\"",
            ]
        );
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let catalog = default_catalog();

        let by_category = ProductQuery::new().search("PERIPH").apply(&catalog);
        assert_eq!(by_category.len(), 2);

        let by_sku = ProductQuery::new().search("dell-u").apply(&catalog);
        assert_eq!(names(&by_sku), vec!["Dell UltraSharp 27\""]);

        let none = ProductQuery::new().search("zzz").apply(&catalog);
        assert!(none.is_empty());

        let blank = ProductQuery::new().search("   ").apply(&catalog);
        assert_eq!(blank.len(), catalog.len());
    }

    #[test]
    fn sorts_by_numeric_columns() {
        let catalog = default_catalog();

        let by_price = ProductQuery::new()
            .sort_by(SortKey::UnitPrice, SortOrder::Desc)
            .apply(&catalog);
        assert_eq!(by_price[0].unit_price, Decimal::from(1999));
        assert_eq!(by_price[3].unit_price, Decimal::from(99));

        let by_stock = ProductQuery::new()
            .sort_by(SortKey::QuantityInStock, SortOrder::Asc)
            .apply(&catalog);
        let stock: Vec<u64> = by_stock.iter().map(|p| p.quantity_in_stock).collect();
        assert_eq!(stock, vec![0, 3, 8, 15]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let catalog = default_catalog();
        let result = ProductQuery::new()
            .sort_by(SortKey::Category, SortOrder::Asc)
            .apply(&catalog);
        // Both peripherals keep catalog order ("3" before "4").
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn every_sort_key_has_a_comparator() {
        let catalog = default_catalog();
        for key in [
            SortKey::Sku,
            SortKey::Name,
            SortKey::Category,
            SortKey::UnitPrice,
            SortKey::QuantityInStock,
        ] {
            let asc = ProductQuery::new().sort_by(key, SortOrder::Asc).apply(&catalog);
            for pair in asc.windows(2) {
                assert_ne!((key.comparator())(&pair[0], &pair[1]), Ordering::Greater);
            }
        }
    }

    #[test]
    fn select_toggles_or_switches() {
        let sort = ProductSort::default();
        let flipped = sort.select(SortKey::Name);
        assert_eq!(flipped, ProductSort::new(SortKey::Name, SortOrder::Desc));

        let switched = flipped.select(SortKey::Sku);
        assert_eq!(switched, ProductSort::new(SortKey::Sku, SortOrder::Asc));
    }

    #[test]
    fn restock_alerts_include_low_and_out_of_stock() {
        let alerts = restock_alerts(&default_catalog());
        let ids: Vec<&str> = alerts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn recent_takes_newest_first_prefix() {
        let history: Vec<Movement> = (0..8)
            .map(|i| Movement {
                id: MovementId::from(format!("m-{i}").as_str()),
                product_id: ProductId::from("1"),
                kind: MovementType::Entry,
                quantity: 1,
                date: Utc::now(),
                reason: MovementRequest::entry(ProductId::from("1"), 1).effective_reason(),
                product_name: "MacBook Pro 14\"".to_string(),
            })
            .collect();

        let latest = recent(&history, RECENT_MOVEMENTS);
        assert_eq!(latest.len(), 5);
        assert_eq!(latest[0].id.as_str(), "m-0");
        assert!(recent(&history[..2], RECENT_MOVEMENTS).len() == 2);
    }
}
