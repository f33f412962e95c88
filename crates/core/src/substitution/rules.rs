//! Substitution knowledge base.
//!
//! Rules are versioned reference data: a builtin seed table ships with
//! the crate, and an operator can load a replacement rule book from a
//! TOML asset without touching engine logic. Rules are keyed by the
//! canonical (lower-cased, trimmed) ingredient name; lookups are exact
//! string matches, no fuzzy matching.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::types::{Impact, ImpactProfile, Reason, SubstitutionRule};
use crate::domain::product::canonical_name;
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy)]
struct RuleSeed {
    ingredient: &'static str,
    substitute: &'static str,
    reason: Reason,
    confidence: f64,
    cost_difference: f64,
    quantity_adjustment: f64,
    notes: &'static str,
    category: &'static str,
    taste: Impact,
    texture: Impact,
    nutrition: Impact,
}

const RULE_SEEDS: &[RuleSeed] = &[
    RuleSeed {
        ingredient: "blueberries",
        substitute: "Strawberries",
        reason: Reason::Availability,
        confidence: 0.90,
        cost_difference: 0.50,
        quantity_adjustment: 1.0,
        notes: "Comparable sweetness and moisture in baked goods and toppings",
        category: "produce",
        taste: Impact::Similar,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
    RuleSeed {
        ingredient: "blueberries",
        substitute: "Raspberries",
        reason: Reason::Availability,
        confidence: 0.80,
        cost_difference: 1.20,
        quantity_adjustment: 1.0,
        notes: "Sharper flavor; works in the same preparations",
        category: "produce",
        taste: Impact::Different,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
    RuleSeed {
        ingredient: "dark chocolate",
        substitute: "Chocolate",
        reason: Reason::Cost,
        confidence: 0.85,
        cost_difference: -3.00,
        quantity_adjustment: 1.2,
        notes: "Standard baking chocolate at a higher dosage for depth",
        category: "baking",
        taste: Impact::Similar,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
    RuleSeed {
        ingredient: "dark chocolate",
        substitute: "Cocoa Powder",
        reason: Reason::Cost,
        confidence: 0.70,
        cost_difference: -8.00,
        quantity_adjustment: 0.4,
        notes: "Requires added fat to match mouthfeel",
        category: "baking",
        taste: Impact::Similar,
        texture: Impact::Different,
        nutrition: Impact::Better,
    },
    RuleSeed {
        ingredient: "chocolate",
        substitute: "Cocoa Powder",
        reason: Reason::Cost,
        confidence: 0.75,
        cost_difference: -6.00,
        quantity_adjustment: 0.35,
        notes: "Concentrated; reduce quantity and add fat",
        category: "baking",
        taste: Impact::Similar,
        texture: Impact::Different,
        nutrition: Impact::Better,
    },
    RuleSeed {
        ingredient: "chocolate",
        substitute: "Carob Powder",
        reason: Reason::Allergen,
        confidence: 0.60,
        cost_difference: -4.00,
        quantity_adjustment: 0.35,
        notes: "Caffeine-free and naturally sweet; noticeably different flavor",
        category: "baking",
        taste: Impact::Different,
        texture: Impact::Different,
        nutrition: Impact::Better,
    },
    RuleSeed {
        ingredient: "milk",
        substitute: "Almond Milk",
        reason: Reason::Allergen,
        confidence: 0.85,
        cost_difference: 1.00,
        quantity_adjustment: 1.0,
        notes: "Dairy-free; thinner body in sauces",
        category: "dairy",
        taste: Impact::Similar,
        texture: Impact::Different,
        nutrition: Impact::Different,
    },
    RuleSeed {
        ingredient: "milk",
        substitute: "Oat Milk",
        reason: Reason::Allergen,
        confidence: 0.85,
        cost_difference: 1.20,
        quantity_adjustment: 1.0,
        notes: "Dairy-free with the closest body to whole milk",
        category: "dairy",
        taste: Impact::Similar,
        texture: Impact::Similar,
        nutrition: Impact::Different,
    },
    RuleSeed {
        ingredient: "butter",
        substitute: "Olive Oil",
        reason: Reason::Cost,
        confidence: 0.75,
        cost_difference: -1.50,
        quantity_adjustment: 0.75,
        notes: "Use three quarters the amount; not suited to laminated doughs",
        category: "fats",
        taste: Impact::Different,
        texture: Impact::Different,
        nutrition: Impact::Better,
    },
    RuleSeed {
        ingredient: "butter",
        substitute: "Coconut Oil",
        reason: Reason::Flavor,
        confidence: 0.70,
        cost_difference: 0.80,
        quantity_adjustment: 0.8,
        notes: "Adds a mild coconut note; solid at room temperature",
        category: "fats",
        taste: Impact::Different,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
    RuleSeed {
        ingredient: "sugar",
        substitute: "Honey",
        reason: Reason::Flavor,
        confidence: 0.80,
        cost_difference: 2.00,
        quantity_adjustment: 0.7,
        notes: "Sweeter by weight; reduce other liquids slightly",
        category: "sweetener",
        taste: Impact::Different,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
    RuleSeed {
        ingredient: "sugar",
        substitute: "Maple Syrup",
        reason: Reason::Flavor,
        confidence: 0.75,
        cost_difference: 3.50,
        quantity_adjustment: 0.7,
        notes: "Distinct flavor; best in breakfast and glaze applications",
        category: "sweetener",
        taste: Impact::Different,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
    RuleSeed {
        ingredient: "eggs",
        substitute: "Flax Seeds",
        reason: Reason::Allergen,
        confidence: 0.65,
        cost_difference: -0.50,
        quantity_adjustment: 0.25,
        notes: "Ground flax with water binds in baked goods; not for custards",
        category: "baking",
        taste: Impact::Similar,
        texture: Impact::Different,
        nutrition: Impact::Different,
    },
    RuleSeed {
        ingredient: "all-purpose flour",
        substitute: "Whole Wheat Flour",
        reason: Reason::Nutritional,
        confidence: 0.80,
        cost_difference: 0.50,
        quantity_adjustment: 1.0,
        notes: "Denser crumb; higher fiber",
        category: "baking",
        taste: Impact::Different,
        texture: Impact::Different,
        nutrition: Impact::Better,
    },
    RuleSeed {
        ingredient: "heavy cream",
        substitute: "Coconut Cream",
        reason: Reason::Allergen,
        confidence: 0.70,
        cost_difference: 0.90,
        quantity_adjustment: 1.0,
        notes: "Whips and reduces like dairy cream with a coconut note",
        category: "dairy",
        taste: Impact::Different,
        texture: Impact::Similar,
        nutrition: Impact::Similar,
    },
];

impl RuleSeed {
    fn into_rule(self) -> SubstitutionRule {
        SubstitutionRule {
            substitute_name: self.substitute.to_owned(),
            reason: self.reason,
            confidence: self.confidence,
            cost_difference: self.cost_difference,
            quantity_adjustment: self.quantity_adjustment,
            notes: self.notes.to_owned(),
            impact: ImpactProfile {
                taste: self.taste,
                texture: self.texture,
                nutrition: self.nutrition,
                // Placeholder; the assembler recomputes cost impact live.
                cost: Impact::Similar,
            },
            category: self.category.to_owned(),
        }
    }
}

/// TOML document schema for an external rule book asset.
#[derive(Debug, Deserialize)]
struct RuleBookDoc {
    #[serde(default)]
    version: Option<String>,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    ingredient: String,
    substitute: String,
    reason: Reason,
    confidence: f64,
    cost_difference: f64,
    quantity_adjustment: f64,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    category: String,
    impact: ImpactEntry,
}

#[derive(Debug, Deserialize)]
struct ImpactEntry {
    taste: Impact,
    texture: Impact,
    nutrition: Impact,
}

/// Immutable substitution rule table, loaded once at startup.
#[derive(Debug)]
pub struct RuleBook {
    version: Option<String>,
    rules: BTreeMap<String, Vec<SubstitutionRule>>,
}

impl RuleBook {
    /// The rule book compiled into the crate.
    pub fn builtin() -> Self {
        let mut rules: BTreeMap<String, Vec<SubstitutionRule>> = BTreeMap::new();
        for seed in RULE_SEEDS {
            rules.entry(seed.ingredient.to_owned()).or_default().push(seed.into_rule());
        }
        Self { version: None, rules }
    }

    /// Parse a rule book from a TOML asset.
    pub fn from_toml_str(raw: &str) -> Result<Self, DomainError> {
        let doc: RuleBookDoc = toml::from_str(raw)
            .map_err(|source| DomainError::InvalidRuleBook(source.to_string()))?;

        let mut rules: BTreeMap<String, Vec<SubstitutionRule>> = BTreeMap::new();
        for entry in doc.rules {
            if !(0.0..=1.0).contains(&entry.confidence) {
                return Err(DomainError::InvalidRuleBook(format!(
                    "rule `{}` -> `{}`: confidence {} is outside [0, 1]",
                    entry.ingredient, entry.substitute, entry.confidence
                )));
            }
            if entry.quantity_adjustment < 0.0 {
                return Err(DomainError::InvalidRuleBook(format!(
                    "rule `{}` -> `{}`: quantity_adjustment must not be negative",
                    entry.ingredient, entry.substitute
                )));
            }
            // Quantity suggestions are produced by the optimizer and
            // always point back at the original product; a rule-book
            // entry with this tag would emit a different product id.
            if entry.reason == Reason::Quantity {
                return Err(DomainError::InvalidRuleBook(format!(
                    "rule `{}` -> `{}`: reason `quantity` is reserved for the quantity optimizer",
                    entry.ingredient, entry.substitute
                )));
            }

            rules.entry(canonical_name(&entry.ingredient)).or_default().push(SubstitutionRule {
                substitute_name: entry.substitute,
                reason: entry.reason,
                confidence: entry.confidence,
                cost_difference: entry.cost_difference,
                quantity_adjustment: entry.quantity_adjustment,
                notes: entry.notes,
                impact: ImpactProfile {
                    taste: entry.impact.taste,
                    texture: entry.impact.texture,
                    nutrition: entry.impact.nutrition,
                    cost: Impact::Similar,
                },
                category: entry.category,
            });
        }

        Ok(Self { version: doc.version, rules })
    }

    /// Load a rule book asset from disk.
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            DomainError::InvalidRuleBook(format!("could not read `{}`: {source}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Rules for a canonical ingredient name, in knowledge-base order.
    /// Unknown names yield an empty slice.
    pub fn lookup(&self, name: &str) -> &[SubstitutionRule] {
        self.rules.get(&canonical_name(name)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All (ingredient, rules) pairs in deterministic order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[SubstitutionRule])> {
        self.rules.iter().map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }
}

/// Pure filter over a rule slice by reason tag.
pub fn filter_by_reason<'a>(
    rules: &'a [SubstitutionRule],
    reason: Reason,
) -> impl Iterator<Item = &'a SubstitutionRule> {
    rules.iter().filter(move |rule| rule.reason == reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_canonicalized() {
        let rules = RuleBook::builtin();
        assert!(!rules.lookup(" Dark Chocolate ").is_empty());
        assert!(rules.lookup("unobtainium").is_empty());
    }

    #[test]
    fn lookup_preserves_rule_order() {
        let rules = RuleBook::builtin();
        let blueberry_rules = rules.lookup("blueberries");
        assert_eq!(blueberry_rules[0].substitute_name, "Strawberries");
        assert_eq!(blueberry_rules[1].substitute_name, "Raspberries");
    }

    #[test]
    fn filter_by_reason_only_keeps_matching_tag() {
        let rules = RuleBook::builtin();
        let chocolate_rules = rules.lookup("chocolate");
        let cost_rules: Vec<_> = filter_by_reason(chocolate_rules, Reason::Cost).collect();
        assert_eq!(cost_rules.len(), 1);
        assert_eq!(cost_rules[0].substitute_name, "Cocoa Powder");
    }

    #[test]
    fn toml_asset_parses_and_validates() {
        let raw = r#"
            version = "2026-08"

            [[rule]]
            ingredient = "Basil"
            substitute = "Oregano"
            reason = "flavor"
            confidence = 0.6
            cost_difference = -0.4
            quantity_adjustment = 0.8
            notes = "Stronger herb; use less"
            category = "herbs"
            impact = { taste = "different", texture = "similar", nutrition = "similar" }
        "#;

        let book = RuleBook::from_toml_str(raw).unwrap();
        assert_eq!(book.version(), Some("2026-08"));
        assert_eq!(book.lookup("basil").len(), 1);
        assert_eq!(book.lookup("basil")[0].reason, Reason::Flavor);
    }

    #[test]
    fn toml_asset_rejects_out_of_range_confidence() {
        let raw = r#"
            [[rule]]
            ingredient = "Basil"
            substitute = "Oregano"
            reason = "flavor"
            confidence = 1.4
            cost_difference = 0.0
            quantity_adjustment = 1.0
            impact = { taste = "similar", texture = "similar", nutrition = "similar" }
        "#;

        let error = RuleBook::from_toml_str(raw).unwrap_err();
        assert!(error.to_string().contains("confidence"));
    }

    #[test]
    fn toml_asset_rejects_quantity_tagged_rules() {
        let raw = r#"
            [[rule]]
            ingredient = "Sugar"
            substitute = "Honey"
            reason = "quantity"
            confidence = 0.5
            cost_difference = 0.0
            quantity_adjustment = 0.7
            impact = { taste = "similar", texture = "similar", nutrition = "similar" }
        "#;

        let error = RuleBook::from_toml_str(raw).unwrap_err();
        assert!(error.to_string().contains("quantity"));
    }

    #[test]
    fn toml_asset_rejects_negative_quantity_adjustment() {
        let raw = r#"
            [[rule]]
            ingredient = "Basil"
            substitute = "Oregano"
            reason = "flavor"
            confidence = 0.5
            cost_difference = 0.0
            quantity_adjustment = -0.5
            impact = { taste = "similar", texture = "similar", nutrition = "similar" }
        "#;

        assert!(RuleBook::from_toml_str(raw).is_err());
    }
}
