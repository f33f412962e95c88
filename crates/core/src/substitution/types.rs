//! Types for the substitution engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// Why a substitution is being proposed. The consumer groups its views
/// purely by filtering on this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Availability,
    Cost,
    Nutritional,
    Allergen,
    Flavor,
    Quantity,
}

impl Reason {
    pub fn description(&self) -> &'static str {
        match self {
            Reason::Availability => "Original ingredient is out of stock",
            Reason::Cost => "A cheaper alternative is available",
            Reason::Nutritional => "Improves the nutritional profile",
            Reason::Allergen => "Avoids a common allergen",
            Reason::Flavor => "Offers a different flavor direction",
            Reason::Quantity => "Per-serving quantity looks like a data-entry error",
        }
    }
}

/// Qualitative effect of a substitution on one dimension of the dish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Better,
    Similar,
    Worse,
    Different,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactProfile {
    pub taste: Impact,
    pub texture: Impact,
    pub nutrition: Impact,
    /// Recomputed from the live cost differential at suggestion time;
    /// the static rule value is only a placeholder.
    pub cost: Impact,
}

/// A static substitution rule from the knowledge base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    pub substitute_name: String,
    pub reason: Reason,
    /// Static [0,1] reliability score. Never recomputed at runtime.
    pub confidence: f64,
    /// Static per-unit cost estimate; negative means the substitute is
    /// expected to be cheaper.
    pub cost_difference: f64,
    /// Multiplier converting an original quantity into the equivalent
    /// substitute quantity. Never negative.
    pub quantity_adjustment: f64,
    pub notes: String,
    pub impact: ImpactProfile,
    pub category: String,
}

/// Current market data for an ingredient name, produced by the external
/// price oracle and cached by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealProductData {
    pub name: String,
    pub category: String,
    pub typical_price: f64,
    pub unit: String,
    pub package_size: f64,
    pub source: String,
    pub last_updated: DateTime<Utc>,
}

/// The engine's sole output unit: a proposed substitution or quantity
/// change. Ephemeral; never persisted by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionSuggestion {
    pub original_product_id: ProductId,
    pub original_product_name: String,
    /// Synthetic id when the substitute is not yet catalogued. For
    /// `reason = quantity` this equals the original product id.
    pub suggested_product_id: ProductId,
    pub suggested_product_name: String,
    pub reason: Reason,
    pub confidence: f64,
    /// Live recomputed per-unit delta; negative means savings.
    pub cost_difference: f64,
    pub quantity_adjustment: f64,
    pub notes: String,
    pub impact: ImpactProfile,
}
