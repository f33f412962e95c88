//! Suggestion classifier and assembler.
//!
//! One pipeline serves both pricing modes: `Live` recomputes cost
//! differentials from oracle data, `Static` uses the rule book's
//! estimates and never touches the oracle. Classification precedence:
//!
//! - availability rules fire only for out-of-stock products, and always
//!   fire regardless of the live cost sign;
//! - cost rules fire only for in-stock products whose live differential
//!   is actually negative, and are suppressed entirely while the product
//!   is out of stock;
//! - nutritional/allergen/flavor rules fire for in-stock products under
//!   their own reason tag;
//! - quantity suggestions come from the independent optimizer.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::availability::is_out_of_stock;
use super::cache::CachedPriceSource;
use super::cost::{compute_cost_difference, cost_impact};
use super::quantity::optimize_quantities;
use super::rules::RuleBook;
use super::types::{ImpactProfile, Reason, SubstitutionRule, SubstitutionSuggestion};
use crate::domain::catalog::Catalog;
use crate::domain::inventory::{stock_line, InventoryItem};
use crate::domain::product::{Product, ProductId};
use crate::domain::recipe::Recipe;

/// Where cost differentials come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PricingMode {
    /// Rule-book estimates only; no oracle calls.
    Static,
    /// Recompute from oracle data, falling back to the static estimate
    /// when the oracle has none.
    Live,
}

/// How the differential on an emitted suggestion was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
enum PriceProvenance {
    /// Recomputed from oracle data, with its source and freshness.
    Live { source: String, as_of: DateTime<Utc> },
    /// Live mode, but the oracle had no data; static estimate used.
    LiveUnavailable,
    /// Static mode; live pricing was never attempted.
    RuleBook,
}

pub struct SubstitutionEngine {
    rules: RuleBook,
    prices: CachedPriceSource,
    mode: PricingMode,
}

impl SubstitutionEngine {
    pub fn new(rules: RuleBook, prices: CachedPriceSource) -> Self {
        Self { rules, prices, mode: PricingMode::Live }
    }

    pub fn with_mode(rules: RuleBook, prices: CachedPriceSource, mode: PricingMode) -> Self {
        Self { rules, prices, mode }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Suggestions for every ingredient of a recipe, plus quantity
    /// anomaly suggestions. Always returns a (possibly empty) list;
    /// per-ingredient problems degrade to skips, never to errors.
    pub async fn suggest_for_recipe(
        &self,
        recipe: &Recipe,
        catalog: &Catalog,
        inventory: &[InventoryItem],
    ) -> Vec<SubstitutionSuggestion> {
        if self.mode == PricingMode::Live {
            self.prices.prefetch(self.candidate_substitute_names(recipe, catalog, inventory)).await;
        }

        let mut suggestions = Vec::new();

        for ingredient in &recipe.ingredients {
            let Some(product) = catalog.find(&ingredient.product_id) else {
                debug!(
                    event_name = "substitution.engine.unknown_product",
                    product_id = %ingredient.product_id,
                    recipe = %recipe.name,
                    "skipping ingredient with no catalog entry"
                );
                continue;
            };

            let inventory_item = stock_line(inventory, &product.id);
            suggestions.extend(self.rule_suggestions(product, inventory_item, catalog).await);
        }

        suggestions.extend(optimize_quantities(&recipe.ingredients, recipe.servings, catalog));
        suggestions
    }

    /// Suggestions for a single catalog product. No quantity analysis;
    /// that needs a recipe's quantities.
    pub async fn suggest_for_product(
        &self,
        product_id: &ProductId,
        catalog: &Catalog,
        inventory: &[InventoryItem],
    ) -> Vec<SubstitutionSuggestion> {
        let Some(product) = catalog.find(product_id) else {
            debug!(
                event_name = "substitution.engine.unknown_product",
                product_id = %product_id,
                "no catalog entry for requested product"
            );
            return Vec::new();
        };

        if self.mode == PricingMode::Live {
            let out = is_out_of_stock(product, stock_line(inventory, &product.id));
            let names: Vec<String> = self
                .rules
                .lookup(&product.canonical_name())
                .iter()
                .filter(|rule| rule_is_candidate(rule, out))
                .map(|rule| rule.substitute_name.clone())
                .collect();
            self.prices.prefetch(names).await;
        }

        self.rule_suggestions(product, stock_line(inventory, &product.id), catalog).await
    }

    /// Distinct substitute names whose prices the recipe evaluation will
    /// need, for one concurrent prefetch round.
    fn candidate_substitute_names(
        &self,
        recipe: &Recipe,
        catalog: &Catalog,
        inventory: &[InventoryItem],
    ) -> Vec<String> {
        let mut names = HashSet::new();

        for ingredient in &recipe.ingredients {
            let Some(product) = catalog.find(&ingredient.product_id) else {
                continue;
            };
            let out = is_out_of_stock(product, stock_line(inventory, &product.id));

            for rule in self.rules.lookup(&product.canonical_name()) {
                if rule_is_candidate(rule, out) {
                    names.insert(rule.substitute_name.clone());
                }
            }
        }

        names.into_iter().collect()
    }

    async fn rule_suggestions(
        &self,
        product: &Product,
        inventory_item: Option<&InventoryItem>,
        catalog: &Catalog,
    ) -> Vec<SubstitutionSuggestion> {
        let out = is_out_of_stock(product, inventory_item);
        let rules = self.rules.lookup(&product.canonical_name());
        if rules.is_empty() {
            debug!(
                event_name = "substitution.engine.no_rules",
                ingredient = %product.name,
                "knowledge base has no rules for ingredient"
            );
            return Vec::new();
        }

        let mut suggestions = Vec::new();

        for rule in rules {
            if !rule_is_candidate(rule, out) {
                continue;
            }

            let (cost_difference, provenance) = self.resolve_cost_difference(product, rule).await;

            let reason = if out { Reason::Availability } else { rule.reason };
            if reason == Reason::Cost && cost_difference >= 0.0 {
                // Never show a "cost savings" label that the live data
                // does not back up.
                continue;
            }

            let suggested_product = catalog.find_by_canonical_name(&rule.substitute_name);
            let suggested_product_id = match suggested_product {
                Some(substitute) if substitute.id == product.id => {
                    debug!(
                        event_name = "substitution.engine.self_substitution",
                        ingredient = %product.name,
                        "rule resolves to the original product; dropped"
                    );
                    continue;
                }
                Some(substitute) => substitute.id.clone(),
                None => ProductId::new(format!("pending-{}", Uuid::new_v4())),
            };

            suggestions.push(SubstitutionSuggestion {
                original_product_id: product.id.clone(),
                original_product_name: product.name.clone(),
                suggested_product_id,
                suggested_product_name: rule.substitute_name.clone(),
                reason,
                confidence: rule.confidence,
                cost_difference,
                quantity_adjustment: rule.quantity_adjustment.max(0.0),
                notes: annotate(rule, cost_difference, provenance),
                impact: ImpactProfile { cost: cost_impact(cost_difference), ..rule.impact },
            });
        }

        suggestions
    }

    /// Differential plus provenance for one rule. In live mode an
    /// oracle miss falls back to the rule's static estimate so the
    /// suggestion is still priced, just flagged as unverified.
    async fn resolve_cost_difference(
        &self,
        product: &Product,
        rule: &SubstitutionRule,
    ) -> (f64, PriceProvenance) {
        if self.mode == PricingMode::Static {
            return (rule.cost_difference, PriceProvenance::RuleBook);
        }

        match self.prices.price_for(&rule.substitute_name).await {
            Some(data) => {
                let delta = compute_cost_difference(product, Some(&data), rule.quantity_adjustment);
                (delta, PriceProvenance::Live { source: data.source, as_of: data.last_updated })
            }
            None => (rule.cost_difference, PriceProvenance::LiveUnavailable),
        }
    }
}

/// Whether a rule can produce a suggestion in the given stock state.
/// Availability rules need an out-of-stock product; every other tag
/// needs an in-stock one. Quantity-tagged rules never fire here: that
/// reason belongs to the optimizer, whose suggestions point back at
/// the original product.
fn rule_is_candidate(rule: &SubstitutionRule, out_of_stock: bool) -> bool {
    if rule.reason == Reason::Quantity {
        return false;
    }
    if out_of_stock {
        rule.reason == Reason::Availability
    } else {
        rule.reason != Reason::Availability
    }
}

fn annotate(rule: &SubstitutionRule, cost_difference: f64, provenance: PriceProvenance) -> String {
    match provenance {
        PriceProvenance::Live { source, as_of } => format!(
            "{}. Live per-unit cost delta {:+.2} per {}, updated {}.",
            rule.notes,
            cost_difference,
            source,
            as_of.format("%Y-%m-%d")
        ),
        PriceProvenance::LiveUnavailable => format!(
            "{}. Cost delta {:+.2} is estimated (live price unavailable).",
            rule.notes, cost_difference
        ),
        PriceProvenance::RuleBook => format!(
            "{}. Cost delta {:+.2} is the rule-book estimate.",
            rule.notes, cost_difference
        ),
    }
}
