//! Per-serving quantity anomaly detection.
//!
//! Flags implausibly large per-serving quantities, which in practice are
//! almost always data-entry errors (a per-batch amount typed into a
//! per-serving field). Operates on quantity and product name only,
//! independent of stock and pricing state.

use tracing::debug;

use super::cost::cost_impact;
use super::types::{Impact, ImpactProfile, Reason, SubstitutionSuggestion};
use crate::domain::catalog::Catalog;
use crate::domain::recipe::RecipeIngredient;

#[derive(Debug, Clone, Copy)]
enum SuggestedQuantity {
    /// Replace with a fixed per-serving amount.
    Fixed(f64),
    /// Scale the original down by a factor.
    Scaled(f64),
}

#[derive(Debug, Clone, Copy)]
struct QuantityThreshold {
    /// Case-insensitive substring matched against the product name.
    keyword: &'static str,
    max_per_serving: f64,
    suggested: SuggestedQuantity,
    confidence: f64,
}

/// Category thresholds, first match wins.
const CATEGORY_THRESHOLDS: &[QuantityThreshold] = &[
    QuantityThreshold {
        keyword: "chocolate",
        max_per_serving: 0.2,
        suggested: SuggestedQuantity::Fixed(0.1),
        confidence: 0.85,
    },
    QuantityThreshold {
        keyword: "sugar",
        max_per_serving: 0.3,
        suggested: SuggestedQuantity::Fixed(0.2),
        confidence: 0.85,
    },
    QuantityThreshold {
        keyword: "butter",
        max_per_serving: 0.2,
        suggested: SuggestedQuantity::Fixed(0.15),
        confidence: 0.85,
    },
];

/// Fallback for products with no category keyword match.
const GENERAL_THRESHOLD: QuantityThreshold = QuantityThreshold {
    keyword: "",
    max_per_serving: 0.5,
    suggested: SuggestedQuantity::Scaled(0.3),
    confidence: 0.70,
};

fn threshold_for(product_name: &str) -> QuantityThreshold {
    let normalized = product_name.to_lowercase();
    CATEGORY_THRESHOLDS
        .iter()
        .copied()
        .find(|threshold| normalized.contains(threshold.keyword))
        .unwrap_or(GENERAL_THRESHOLD)
}

/// Scan a recipe's ingredient list for quantity anomalies and propose
/// corrective adjustments. A `quantity` suggestion points back at the
/// original product: it proposes a different amount, not a different
/// ingredient.
pub fn optimize_quantities(
    ingredients: &[RecipeIngredient],
    servings: u32,
    catalog: &Catalog,
) -> Vec<SubstitutionSuggestion> {
    let mut suggestions = Vec::new();

    for ingredient in ingredients {
        let Some(product) = catalog.find(&ingredient.product_id) else {
            debug!(
                event_name = "substitution.quantity.unknown_product",
                product_id = %ingredient.product_id,
                "skipping ingredient with no catalog entry"
            );
            continue;
        };

        let per_serving = ingredient.per_serving(servings);
        if per_serving <= 0.0 {
            continue;
        }

        let threshold = threshold_for(&product.name);
        if per_serving <= threshold.max_per_serving {
            continue;
        }

        let suggested = match threshold.suggested {
            SuggestedQuantity::Fixed(amount) => amount,
            SuggestedQuantity::Scaled(factor) => per_serving * factor,
        };

        let cost_per_unit = product.cost_per_unit();
        let cost_difference = -((per_serving - suggested) * cost_per_unit);

        suggestions.push(SubstitutionSuggestion {
            original_product_id: product.id.clone(),
            original_product_name: product.name.clone(),
            suggested_product_id: product.id.clone(),
            suggested_product_name: product.name.clone(),
            reason: Reason::Quantity,
            confidence: threshold.confidence,
            cost_difference,
            quantity_adjustment: suggested / per_serving,
            notes: format!(
                "{:.2} {} per serving looks excessive for {}; {:.2} {} is typical. Saving {:.2} per serving.",
                per_serving,
                ingredient.unit,
                product.name,
                suggested,
                ingredient.unit,
                cost_difference.abs()
            ),
            impact: ImpactProfile {
                taste: Impact::Similar,
                texture: Impact::Similar,
                nutrition: Impact::Similar,
                cost: cost_impact(cost_difference),
            },
        });
    }

    suggestions
}
