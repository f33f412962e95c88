use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub cache: CacheConfig,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

/// External market-price provider. With no base URL configured, callers
/// fall back to the builtin reference price table.
#[derive(Clone, Debug)]
pub struct MarketConfig {
    pub base_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub ttl_hours: i64,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    /// Optional rule book TOML asset; the builtin table is used when absent.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub market_base_url: Option<String>,
    pub market_api_key: Option<String>,
    pub rules_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig { base_url: None, api_key: None, timeout_secs: 10 },
            cache: CacheConfig { ttl_hours: crate::substitution::PRICE_CACHE_TTL_HOURS },
            rules: RulesConfig { path: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    market: Option<MarketPatch>,
    cache: Option<CachePatch>,
    rules: Option<RulesPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MarketPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CachePatch {
    ttl_hours: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("larder.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(market) = patch.market {
            if let Some(base_url) = market.base_url {
                self.market.base_url = Some(base_url);
            }
            if let Some(api_key_value) = market.api_key {
                self.market.api_key = Some(secret_value(api_key_value));
            }
            if let Some(timeout_secs) = market.timeout_secs {
                self.market.timeout_secs = timeout_secs;
            }
        }

        if let Some(cache) = patch.cache {
            if let Some(ttl_hours) = cache.ttl_hours {
                self.cache.ttl_hours = ttl_hours;
            }
        }

        if let Some(rules) = patch.rules {
            if let Some(path) = rules.path {
                self.rules.path = Some(path);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LARDER_MARKET_BASE_URL") {
            self.market.base_url = Some(value);
        }
        if let Some(value) = read_env("LARDER_MARKET_API_KEY") {
            self.market.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("LARDER_MARKET_TIMEOUT_SECS") {
            self.market.timeout_secs = parse_u64("LARDER_MARKET_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("LARDER_CACHE_TTL_HOURS") {
            self.cache.ttl_hours = parse_i64("LARDER_CACHE_TTL_HOURS", &value)?;
        }

        if let Some(value) = read_env("LARDER_RULES_PATH") {
            self.rules.path = Some(PathBuf::from(value));
        }

        let log_level = read_env("LARDER_LOGGING_LEVEL").or_else(|| read_env("LARDER_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LARDER_LOGGING_FORMAT").or_else(|| read_env("LARDER_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.market_base_url {
            self.market.base_url = Some(base_url);
        }
        if let Some(api_key) = overrides.market_api_key {
            self.market.api_key = Some(secret_value(api_key));
        }
        if let Some(path) = overrides.rules_path {
            self.rules.path = Some(path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.market.base_url {
            let trimmed = base_url.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::Validation(
                    "market.base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        if self.market.timeout_secs == 0 || self.market.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "market.timeout_secs must be in range 1..=300".to_string(),
            ));
        }

        if self.cache.ttl_hours < 1 || self.cache.ttl_hours > 24 * 7 {
            return Err(ConfigError::Validation(
                "cache.ttl_hours must be in range 1..=168".to_string(),
            ));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "logging.level `{}` is not a valid tracing level",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// API key with the secret exposed, for client construction only.
    pub fn market_api_key(&self) -> Option<&str> {
        self.market.api_key.as_ref().map(|key| key.expose_secret())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("larder.toml"), PathBuf::from("config/larder.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_i64(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
