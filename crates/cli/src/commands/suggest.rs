use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use larder_core::config::AppConfig;
use larder_core::substitution::{
    CachedPriceSource, PriceCache, PriceOracle, PricingMode, RuleBook, SubstitutionEngine,
    SubstitutionSuggestion,
};
use larder_core::{Catalog, InventoryItem, Product, ProductId, Recipe};
use larder_market::{MarketDataClient, ReferencePrices};

#[derive(Debug)]
pub struct SuggestArgs {
    pub catalog: PathBuf,
    pub inventory: Option<PathBuf>,
    pub recipe: Option<PathBuf>,
    pub product: Option<String>,
    pub static_pricing: bool,
    pub json: bool,
}

pub async fn run(config: &AppConfig, args: SuggestArgs) -> Result<String> {
    let catalog = Catalog::new(load_json::<Vec<Product>>(&args.catalog).context("catalog")?);
    let inventory: Vec<InventoryItem> = match &args.inventory {
        Some(path) => load_json(path).context("inventory")?,
        None => Vec::new(),
    };

    let engine = build_engine(config, args.static_pricing)?;

    let suggestions = match (&args.recipe, &args.product) {
        (Some(path), None) => {
            let recipe: Recipe = load_json(path).context("recipe")?;
            engine.suggest_for_recipe(&recipe, &catalog, &inventory).await
        }
        (None, Some(product_id)) => {
            engine
                .suggest_for_product(&ProductId::new(product_id.clone()), &catalog, &inventory)
                .await
        }
        _ => bail!("pass exactly one of --recipe or --product"),
    };

    if args.json {
        return serde_json::to_string_pretty(&suggestions).context("serializing suggestions");
    }

    Ok(render_human(&suggestions))
}

fn build_engine(config: &AppConfig, static_pricing: bool) -> Result<SubstitutionEngine> {
    let rules = match &config.rules.path {
        Some(path) => RuleBook::from_path(path)
            .with_context(|| format!("loading rule book `{}`", path.display()))?,
        None => RuleBook::builtin(),
    };

    let oracle: Arc<dyn PriceOracle> = if config.market.base_url.is_some() {
        Arc::new(MarketDataClient::from_config(&config.market)?)
    } else {
        Arc::new(ReferencePrices::new())
    };

    let cache = Arc::new(PriceCache::with_ttl(chrono_hours(config.cache.ttl_hours)));
    let prices = CachedPriceSource::new(oracle, cache);

    let mode = if static_pricing { PricingMode::Static } else { PricingMode::Live };
    Ok(SubstitutionEngine::with_mode(rules, prices, mode))
}

fn chrono_hours(hours: i64) -> chrono::Duration {
    chrono::Duration::hours(hours)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("could not parse `{}`", path.display()))
}

fn render_human(suggestions: &[SubstitutionSuggestion]) -> String {
    if suggestions.is_empty() {
        return "no suggestions".to_string();
    }

    let mut lines = Vec::with_capacity(suggestions.len() + 1);
    lines.push(format!("{} suggestion(s):", suggestions.len()));

    for suggestion in suggestions {
        lines.push(format!(
            "- {} -> {} [{}] confidence {:.2}, cost {:+.2}, quantity x{:.2}\n    {}",
            suggestion.original_product_name,
            suggestion.suggested_product_name,
            suggestion.reason.description(),
            suggestion.confidence,
            suggestion.cost_difference,
            suggestion.quantity_adjustment,
            suggestion.notes,
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use larder_core::substitution::{Impact, ImpactProfile, Reason};

    use super::*;

    #[test]
    fn human_rendering_handles_empty_results() {
        assert_eq!(render_human(&[]), "no suggestions");
    }

    #[test]
    fn human_rendering_shows_signed_cost() {
        let suggestion = SubstitutionSuggestion {
            original_product_id: ProductId::new("p1"),
            original_product_name: "Dark Chocolate".to_string(),
            suggested_product_id: ProductId::new("p2"),
            suggested_product_name: "Chocolate".to_string(),
            reason: Reason::Cost,
            confidence: 0.85,
            cost_difference: -4.41,
            quantity_adjustment: 1.2,
            notes: "cheaper".to_string(),
            impact: ImpactProfile {
                taste: Impact::Similar,
                texture: Impact::Similar,
                nutrition: Impact::Similar,
                cost: Impact::Better,
            },
        };

        let output = render_human(&[suggestion]);
        assert!(output.contains("-4.41"));
        assert!(output.contains("Dark Chocolate -> Chocolate"));
    }
}
