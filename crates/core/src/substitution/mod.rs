//! Ingredient Substitution Engine
//!
//! Proposes alternative ingredients that solve an availability problem
//! (the ingredient is out of stock) or a cost problem (a cheaper
//! alternative exists), and flags likely quantity data-entry errors.
//! Suggestions are ephemeral: constructed per call, returned to the
//! caller, never persisted here.

pub mod availability;
mod cache;
pub mod cost;
mod engine;
mod oracle;
pub mod quantity;
mod rules;
mod types;

pub use cache::{CachedPriceSource, PriceCache};
pub use engine::{PricingMode, SubstitutionEngine};
pub use oracle::PriceOracle;
pub use rules::{filter_by_reason, RuleBook};
pub use types::*;

/// Oracle results are considered fresh for this long.
pub const PRICE_CACHE_TTL_HOURS: i64 = 24;
