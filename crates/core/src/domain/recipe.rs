//! Recipe and ingredient types.
//!
//! Ingredient quantities arrive from spreadsheet imports and form inputs,
//! so numeric fields may be encoded as strings. All coercion is lenient:
//! an absent or unparsable value resolves to zero rather than an error.

use serde::{Deserialize, Serialize};

use super::product::ProductId;

/// A numeric value that may have been entered as free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// Parse-or-zero coercion. Non-finite numbers and unparsable text
    /// resolve to 0.0.
    pub fn value(&self) -> f64 {
        match self {
            Quantity::Number(n) if n.is_finite() => *n,
            Quantity::Number(_) => 0.0,
            Quantity::Text(raw) => raw.trim().parse::<f64>().unwrap_or(0.0),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit: String,
    /// Usable share of the ingredient after prep, 0..=100. Defaults to 100.
    #[serde(default)]
    pub yield_percentage: Option<Quantity>,
    /// Share lost during prep, 0..=100. Defaults to 0.
    #[serde(default)]
    pub loss_percentage: Option<Quantity>,
}

impl RecipeIngredient {
    pub fn quantity_value(&self) -> f64 {
        self.quantity.value()
    }

    /// Quantity after yield and loss adjustment:
    /// `quantity * yield% * (1 - loss%)`.
    pub fn effective_quantity(&self) -> f64 {
        let yield_fraction = self
            .yield_percentage
            .as_ref()
            .map(|value| value.value() / 100.0)
            .unwrap_or(1.0);
        let loss_fraction = self
            .loss_percentage
            .as_ref()
            .map(|value| value.value() / 100.0)
            .unwrap_or(0.0);

        self.quantity_value() * yield_fraction * (1.0 - loss_fraction)
    }

    /// Effective quantity divided across servings.
    pub fn per_serving(&self, servings: u32) -> f64 {
        self.effective_quantity() / f64::from(servings.max(1))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub servings: u32,
    #[serde(default)]
    pub serving_unit: Option<String>,
}
