//! End-to-end classifier scenarios over the builtin rule book.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use larder_core::domain::product::canonical_name;
use larder_core::substitution::{
    CachedPriceSource, Impact, PriceCache, PriceOracle, PricingMode, RealProductData, Reason,
    RuleBook, SubstitutionEngine,
};
use larder_core::{Catalog, InventoryItem, Product, ProductId, Quantity, Recipe, RecipeIngredient};

struct TableOracle {
    prices: HashMap<String, f64>,
}

impl TableOracle {
    fn new(entries: &[(&str, f64)]) -> Self {
        let prices =
            entries.iter().map(|(name, price)| (canonical_name(name), *price)).collect();
        Self { prices }
    }

    fn empty() -> Self {
        Self { prices: HashMap::new() }
    }
}

#[async_trait]
impl PriceOracle for TableOracle {
    async fn lookup(&self, name: &str) -> Option<RealProductData> {
        self.prices.get(&canonical_name(name)).map(|price| RealProductData {
            name: name.to_string(),
            category: "test".to_string(),
            typical_price: *price,
            unit: "lb".to_string(),
            package_size: 1.0,
            source: "table".to_string(),
            last_updated: Utc::now(),
        })
    }
}

fn product(id: &str, name: &str, cost: f64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        cost,
        quantity: 1.0,
        package_size: 1.0,
        unit: "lb".to_string(),
        is_available: None,
        current_stock: None,
        reorder_point: None,
        substitutes: Vec::new(),
    }
}

fn in_stock(product_id: &str) -> InventoryItem {
    InventoryItem {
        product_id: ProductId::new(product_id),
        current_stock: 10.0,
        reorder_point: 2.0,
        last_updated: None,
    }
}

fn out_of_stock(product_id: &str) -> InventoryItem {
    InventoryItem {
        product_id: ProductId::new(product_id),
        current_stock: 0.0,
        reorder_point: 2.0,
        last_updated: None,
    }
}

fn engine_with(oracle: TableOracle, mode: PricingMode) -> SubstitutionEngine {
    let prices = CachedPriceSource::new(Arc::new(oracle), Arc::new(PriceCache::new()));
    SubstitutionEngine::with_mode(RuleBook::builtin(), prices, mode)
}

fn ingredient(product_id: &str, quantity: f64) -> RecipeIngredient {
    RecipeIngredient {
        product_id: ProductId::new(product_id),
        quantity: Quantity::Number(quantity),
        unit: "lb".to_string(),
        yield_percentage: None,
        loss_percentage: None,
    }
}

#[tokio::test]
async fn out_of_stock_blueberries_produce_availability_suggestions() {
    let engine = engine_with(TableOracle::empty(), PricingMode::Static);
    let catalog = Catalog::new(vec![product("p1", "Blueberries", 4.99)]);
    let inventory = vec![out_of_stock("p1")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| s.reason == Reason::Availability));
    assert_eq!(suggestions[0].suggested_product_name, "Strawberries");
    assert_eq!(suggestions[1].suggested_product_name, "Raspberries");
    // Availability wins even though both substitutes cost more.
    assert!(suggestions.iter().all(|s| s.cost_difference > 0.0));
    // Static mode never claims a live price was attempted.
    assert!(suggestions.iter().all(|s| s.notes.contains("rule-book estimate")));
}

#[tokio::test]
async fn in_stock_dark_chocolate_gets_live_priced_cost_suggestion() {
    let engine = engine_with(TableOracle::new(&[("Chocolate", 12.99)]), PricingMode::Live);
    let catalog = Catalog::new(vec![product("p1", "Dark Chocolate", 20.0)]);
    let inventory = vec![in_stock("p1")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    let chocolate = suggestions
        .iter()
        .find(|s| s.suggested_product_name == "Chocolate")
        .expect("chocolate suggestion");

    assert_eq!(chocolate.reason, Reason::Cost);
    // 12.99 * 1.2 - 20.0
    assert!((chocolate.cost_difference - (-4.412)).abs() < 1e-9);
    assert_eq!(chocolate.impact.cost, Impact::Better);
    assert!(chocolate.notes.contains("Live per-unit cost delta"));
    // Live notes carry the oracle's source and freshness date.
    assert!(chocolate.notes.contains("per table, updated"));
}

#[tokio::test]
async fn oracle_miss_falls_back_to_estimated_differential() {
    let engine = engine_with(TableOracle::empty(), PricingMode::Live);
    let catalog = Catalog::new(vec![product("p1", "Dark Chocolate", 20.0)]);
    let inventory = vec![in_stock("p1")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    let cocoa = suggestions
        .iter()
        .find(|s| s.suggested_product_name == "Cocoa Powder")
        .expect("cocoa suggestion");

    assert!((cocoa.cost_difference - (-8.0)).abs() < 1e-9);
    assert!(cocoa.notes.contains("estimated"));
}

#[tokio::test]
async fn cost_rules_are_suppressed_when_live_delta_is_not_a_saving() {
    // Every candidate substitute prices far above the original, so no
    // cost-tagged rule survives the live check.
    let oracle = TableOracle::new(&[("Chocolate", 100.0), ("Cocoa Powder", 100.0)]);
    let engine = engine_with(oracle, PricingMode::Live);
    let catalog = Catalog::new(vec![product("p1", "Dark Chocolate", 20.0)]);
    let inventory = vec![in_stock("p1")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn cost_rules_never_fire_while_product_is_out_of_stock() {
    let engine = engine_with(TableOracle::new(&[("Chocolate", 1.0)]), PricingMode::Live);
    let catalog = Catalog::new(vec![product("p1", "Dark Chocolate", 20.0)]);
    let inventory = vec![out_of_stock("p1")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    // Dark chocolate has no availability rules, so the out-of-stock
    // state suppresses everything despite the huge saving on offer.
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn catalog_matches_resolve_suggested_product_ids() {
    let engine = engine_with(TableOracle::empty(), PricingMode::Static);
    let catalog = Catalog::new(vec![
        product("p1", "Blueberries", 4.99),
        product("p2", "Strawberries", 6.49),
    ]);
    let inventory = vec![out_of_stock("p1"), in_stock("p2")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    let strawberries =
        suggestions.iter().find(|s| s.suggested_product_name == "Strawberries").unwrap();
    assert_eq!(strawberries.suggested_product_id, ProductId::new("p2"));

    let raspberries =
        suggestions.iter().find(|s| s.suggested_product_name == "Raspberries").unwrap();
    assert!(raspberries.suggested_product_id.0.starts_with("pending-"));
}

#[tokio::test]
async fn self_substitution_rules_are_dropped() {
    let rules = RuleBook::from_toml_str(
        r#"
        [[rule]]
        ingredient = "Strawberries"
        substitute = "Strawberries"
        reason = "flavor"
        confidence = 0.5
        cost_difference = 0.0
        quantity_adjustment = 1.0
        impact = { taste = "similar", texture = "similar", nutrition = "similar" }
        "#,
    )
    .unwrap();
    let prices =
        CachedPriceSource::new(Arc::new(TableOracle::empty()), Arc::new(PriceCache::new()));
    let engine = SubstitutionEngine::with_mode(rules, prices, PricingMode::Static);

    let catalog = Catalog::new(vec![product("p1", "Strawberries", 6.49)]);
    let inventory = vec![in_stock("p1")];

    let suggestions =
        engine.suggest_for_product(&ProductId::new("p1"), &catalog, &inventory).await;

    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn recipe_pipeline_appends_quantity_suggestions() {
    let engine = engine_with(TableOracle::empty(), PricingMode::Static);
    let catalog = Catalog::new(vec![
        product("p1", "Blueberries", 4.99),
        product("p2", "Dark Chocolate", 20.0),
    ]);
    let inventory = vec![out_of_stock("p1"), in_stock("p2")];

    let recipe = Recipe {
        id: "r1".to_string(),
        name: "Berry Torte".to_string(),
        // 0.25 per serving of chocolate trips the category threshold;
        // 0.4 of berries stays under the general one.
        ingredients: vec![ingredient("p1", 0.4), ingredient("p2", 0.25)],
        servings: 1,
        serving_unit: None,
    };

    let suggestions = engine.suggest_for_recipe(&recipe, &catalog, &inventory).await;

    let availability: Vec<_> =
        suggestions.iter().filter(|s| s.reason == Reason::Availability).collect();
    assert_eq!(availability.len(), 2);

    let quantity: Vec<_> = suggestions.iter().filter(|s| s.reason == Reason::Quantity).collect();
    assert_eq!(quantity.len(), 1);
    // Quantity suggestions point back at the ingredient itself.
    assert_eq!(quantity[0].suggested_product_id, ProductId::new("p2"));
    assert!(quantity[0].quantity_adjustment > 0.0);
}

#[tokio::test]
async fn unknown_ingredients_are_skipped_not_fatal() {
    let engine = engine_with(TableOracle::empty(), PricingMode::Static);
    let catalog = Catalog::new(vec![product("p1", "Blueberries", 4.99)]);
    let inventory = vec![out_of_stock("p1")];

    let recipe = Recipe {
        id: "r1".to_string(),
        name: "Mystery Pie".to_string(),
        ingredients: vec![ingredient("ghost", 1.0), ingredient("p1", 1.0)],
        servings: 4,
        serving_unit: None,
    };

    let suggestions = engine.suggest_for_recipe(&recipe, &catalog, &inventory).await;

    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| s.original_product_id == ProductId::new("p1")));
}

#[tokio::test]
async fn missing_product_lookup_returns_empty() {
    let engine = engine_with(TableOracle::empty(), PricingMode::Live);
    let catalog = Catalog::new(Vec::new());

    let suggestions = engine.suggest_for_product(&ProductId::new("nope"), &catalog, &[]).await;

    assert!(suggestions.is_empty());
}
