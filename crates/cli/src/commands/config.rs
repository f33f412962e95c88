use std::env;

use anyhow::Result;
use larder_core::config::AppConfig;

/// Render the effective configuration with env-override attribution and
/// secret redaction.
pub fn run(config: &AppConfig) -> Result<String> {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "market.base_url",
        config.market.base_url.as_deref().unwrap_or("<unset>"),
        "LARDER_MARKET_BASE_URL",
    ));
    let api_key = if config.market.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line("market.api_key", api_key, "LARDER_MARKET_API_KEY"));
    lines.push(render_line(
        "market.timeout_secs",
        &config.market.timeout_secs.to_string(),
        "LARDER_MARKET_TIMEOUT_SECS",
    ));
    lines.push(render_line(
        "cache.ttl_hours",
        &config.cache.ttl_hours.to_string(),
        "LARDER_CACHE_TTL_HOURS",
    ));
    lines.push(render_line(
        "rules.path",
        &config
            .rules
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<builtin>".to_string()),
        "LARDER_RULES_PATH",
    ));
    lines.push(render_line("logging.level", &config.logging.level, "LARDER_LOGGING_LEVEL"));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        "LARDER_LOGGING_FORMAT",
    ));

    Ok(lines.join("\n"))
}

fn render_line(key: &str, value: &str, env_key: &str) -> String {
    let source = if env::var_os(env_key).is_some() {
        format!("env ({env_key})")
    } else {
        "file or default".to_string()
    };
    format!("- {key} = {value} (source: {source})")
}
