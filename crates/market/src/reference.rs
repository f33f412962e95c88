//! Builtin reference price table.
//!
//! The default oracle when no external price service is configured.
//! Prices are typical per-pound retail figures kept alongside the rule
//! book; stale values degrade cost estimates but never break the engine.

use async_trait::async_trait;
use chrono::Utc;

use larder_core::domain::product::canonical_name;
use larder_core::substitution::{PriceOracle, RealProductData};

struct ReferenceEntry {
    name: &'static str,
    category: &'static str,
    price: f64,
}

const REFERENCE_PRICES: &[ReferenceEntry] = &[
    ReferenceEntry { name: "chocolate", category: "baking", price: 12.99 },
    ReferenceEntry { name: "cocoa powder", category: "baking", price: 6.99 },
    ReferenceEntry { name: "carob powder", category: "baking", price: 8.99 },
    ReferenceEntry { name: "dark chocolate", category: "baking", price: 15.99 },
    ReferenceEntry { name: "milk", category: "dairy", price: 4.99 },
    ReferenceEntry { name: "almond milk", category: "dairy", price: 5.99 },
    ReferenceEntry { name: "oat milk", category: "dairy", price: 5.49 },
    ReferenceEntry { name: "butter", category: "fats", price: 6.99 },
    ReferenceEntry { name: "olive oil", category: "fats", price: 8.99 },
    ReferenceEntry { name: "coconut oil", category: "fats", price: 9.49 },
    ReferenceEntry { name: "blueberries", category: "produce", price: 5.99 },
    ReferenceEntry { name: "strawberries", category: "produce", price: 6.49 },
    ReferenceEntry { name: "raspberries", category: "produce", price: 7.99 },
    ReferenceEntry { name: "vanilla extract", category: "baking", price: 4.99 },
    ReferenceEntry { name: "premium vanilla extract", category: "baking", price: 12.99 },
    ReferenceEntry { name: "eggs", category: "dairy", price: 3.99 },
    ReferenceEntry { name: "flax seeds", category: "baking", price: 4.99 },
    ReferenceEntry { name: "all-purpose flour", category: "baking", price: 2.99 },
    ReferenceEntry { name: "whole wheat flour", category: "baking", price: 3.49 },
    ReferenceEntry { name: "sugar", category: "sweetener", price: 2.49 },
    ReferenceEntry { name: "honey", category: "sweetener", price: 5.99 },
    ReferenceEntry { name: "maple syrup", category: "sweetener", price: 8.49 },
    ReferenceEntry { name: "heavy cream", category: "dairy", price: 5.49 },
    ReferenceEntry { name: "coconut cream", category: "dairy", price: 4.29 },
];

const SOURCE_LABEL: &str = "reference price table";

/// Price oracle over the builtin table. Exact canonical-name match
/// first, then first substring match in table order.
#[derive(Default)]
pub struct ReferencePrices;

impl ReferencePrices {
    pub fn new() -> Self {
        Self
    }

    fn find(name: &str) -> Option<&'static ReferenceEntry> {
        let wanted = canonical_name(name);

        REFERENCE_PRICES
            .iter()
            .find(|entry| entry.name == wanted)
            .or_else(|| REFERENCE_PRICES.iter().find(|entry| wanted.contains(entry.name)))
    }
}

#[async_trait]
impl PriceOracle for ReferencePrices {
    async fn lookup(&self, name: &str) -> Option<RealProductData> {
        let entry = Self::find(name)?;

        Some(RealProductData {
            name: name.to_string(),
            category: entry.category.to_string(),
            typical_price: entry.price,
            unit: "lb".to_string(),
            package_size: 1.0,
            source: SOURCE_LABEL.to_string(),
            last_updated: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exact_match_wins_over_substring() {
        let oracle = ReferencePrices::new();
        let data = oracle.lookup("Dark Chocolate").await.unwrap();
        assert!((data.typical_price - 15.99).abs() < 1e-9);
    }

    #[tokio::test]
    async fn substring_match_covers_qualified_names() {
        let oracle = ReferencePrices::new();
        let data = oracle.lookup("Organic Strawberries").await.unwrap();
        assert!((data.typical_price - 6.49).abs() < 1e-9);
        assert_eq!(data.source, "reference price table");
    }

    #[tokio::test]
    async fn unknown_names_resolve_to_none() {
        let oracle = ReferencePrices::new();
        assert!(oracle.lookup("unobtainium").await.is_none());
    }
}
