use anyhow::{Context, Result};
use larder_core::config::AppConfig;
use larder_core::substitution::RuleBook;

pub fn run(config: &AppConfig) -> Result<String> {
    let rules = match &config.rules.path {
        Some(path) => RuleBook::from_path(path)
            .with_context(|| format!("loading rule book `{}`", path.display()))?,
        None => RuleBook::builtin(),
    };

    let mut lines = Vec::new();
    match rules.version() {
        Some(version) => lines.push(format!("rule book version {version} ({} rules):", rules.len())),
        None => lines.push(format!("builtin rule book ({} rules):", rules.len())),
    }

    for (ingredient, ingredient_rules) in rules.entries() {
        lines.push(format!("{ingredient}:"));
        for rule in ingredient_rules {
            lines.push(format!(
                "  -> {} [{}] confidence {:.2}, est. cost {:+.2}, quantity x{:.2}",
                rule.substitute_name,
                rule.reason.description(),
                rule.confidence,
                rule.cost_difference,
                rule.quantity_adjustment,
            ));
        }
    }

    Ok(lines.join("\n"))
}
