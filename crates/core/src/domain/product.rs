use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog product as supplied by the external catalog store.
/// Read-only to the engine; availability and stock fields are optional
/// because older catalog entries predate inventory tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Catalog price for one package.
    pub cost: f64,
    pub quantity: f64,
    pub package_size: f64,
    pub unit: String,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub current_stock: Option<f64>,
    #[serde(default)]
    pub reorder_point: Option<f64>,
    /// Catalog-declared substitute product ids, if any.
    #[serde(default)]
    pub substitutes: Vec<ProductId>,
}

impl Product {
    /// Lower-cased, trimmed display name, the knowledge-base lookup key.
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }

    /// Catalog cost per single unit, guarded against degenerate package sizes.
    pub fn cost_per_unit(&self) -> f64 {
        crate::substitution::cost::per_unit_cost(self.cost, self.package_size)
    }
}

/// Canonicalize an ingredient display name for knowledge-base and cache keys.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}
