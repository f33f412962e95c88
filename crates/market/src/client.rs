//! HTTP price service client.
//!
//! Talks to an external market-price API configured via
//! `market.base_url`. The `PriceOracle` contract requires every failure
//! mode to resolve to `None`; this client logs the failure and moves on,
//! so a flaky price service degrades suggestions instead of breaking
//! them.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use larder_core::config::MarketConfig;
use larder_core::substitution::{PriceOracle, RealProductData};

#[derive(Debug, Error)]
pub enum MarketClientError {
    #[error("market client requires market.base_url to be configured")]
    MissingBaseUrl,
    #[error("could not construct HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Wire shape of the price service's `GET /prices/{name}` response.
#[derive(Debug, Deserialize)]
struct PriceDto {
    name: String,
    #[serde(default)]
    category: Option<String>,
    typical_price: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    package_size: Option<f64>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
}

impl PriceDto {
    fn into_product_data(self) -> RealProductData {
        RealProductData {
            name: self.name,
            category: self.category.unwrap_or_else(|| "unknown".to_string()),
            typical_price: self.typical_price,
            unit: self.unit.unwrap_or_else(|| "lb".to_string()),
            package_size: self.package_size.unwrap_or(1.0),
            source: self.source.unwrap_or_else(|| "market api".to_string()),
            last_updated: self.last_updated.unwrap_or_else(Utc::now),
        }
    }
}

pub struct MarketDataClient {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl MarketDataClient {
    pub fn from_config(config: &MarketConfig) -> Result<Self, MarketClientError> {
        let base_url = config.base_url.clone().ok_or(MarketClientError::MissingBaseUrl)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn price_url(&self, name: &str) -> String {
        format!("{}/prices/{}", self.base_url, urlencode(name))
    }
}

#[async_trait]
impl PriceOracle for MarketDataClient {
    async fn lookup(&self, name: &str) -> Option<RealProductData> {
        let mut request = self.client.get(self.price_url(name));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    event_name = "market.client.request_failed",
                    ingredient = name,
                    error = %error,
                    "price service request failed"
                );
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                event_name = "market.client.bad_status",
                ingredient = name,
                status = %response.status(),
                "price service returned non-success status"
            );
            return None;
        }

        match response.json::<PriceDto>().await {
            Ok(dto) => Some(dto.into_product_data()),
            Err(error) => {
                warn!(
                    event_name = "market.client.bad_body",
                    ingredient = name,
                    error = %error,
                    "price service returned an unparsable body"
                );
                None
            }
        }
    }
}

/// Minimal percent-encoding for a single path segment.
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
