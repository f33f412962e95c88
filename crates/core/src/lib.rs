pub mod config;
pub mod domain;
pub mod errors;
pub mod substitution;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
pub use domain::catalog::Catalog;
pub use domain::inventory::InventoryItem;
pub use domain::product::{Product, ProductId};
pub use domain::recipe::{Quantity, Recipe, RecipeIngredient};
pub use errors::{ApplicationError, DomainError};
pub use substitution::{
    CachedPriceSource, Impact, ImpactProfile, PriceCache, PriceOracle, PricingMode,
    RealProductData, Reason, RuleBook, SubstitutionEngine, SubstitutionRule,
    SubstitutionSuggestion, PRICE_CACHE_TTL_HOURS,
};
