//! Time-bounded price cache over the external price oracle.
//!
//! The cache is an explicit, injectable component so tests can observe
//! oracle call counts and independent engine instances never share
//! state. Negative results are not cached, so a later call retries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::debug;

use super::oracle::PriceOracle;
use super::types::RealProductData;
use crate::domain::product::canonical_name;

#[derive(Clone, Debug)]
struct CacheEntry {
    data: RealProductData,
    fetched_at: DateTime<Utc>,
}

/// TTL-bounded map from canonical substitute name to oracle data.
/// Last-writer-wins on expiry races; cached prices are advisory.
pub struct PriceCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl PriceCache {
    /// Cache with the standard 24 hour TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(super::PRICE_CACHE_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Return the cached value if it is still fresh.
    pub async fn get(&self, name: &str) -> Option<RealProductData> {
        let key = canonical_name(name);
        let entries = self.entries.lock().await;
        let entry = entries.get(&key)?;

        if Utc::now() - entry.fetched_at < self.ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    pub async fn insert(&self, name: &str, data: RealProductData) {
        let key = canonical_name(name);
        let mut entries = self.entries.lock().await;
        entries.insert(key, CacheEntry { data, fetched_at: Utc::now() });
    }

    #[cfg(test)]
    pub(crate) async fn entry_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Oracle access that consults the cache first and writes back on a
/// successful fetch.
#[derive(Clone)]
pub struct CachedPriceSource {
    oracle: Arc<dyn PriceOracle>,
    cache: Arc<PriceCache>,
}

impl CachedPriceSource {
    pub fn new(oracle: Arc<dyn PriceOracle>, cache: Arc<PriceCache>) -> Self {
        Self { oracle, cache }
    }

    /// Resolve a typical price for a substitute name. `None` means the
    /// oracle had no data; the miss is not cached.
    pub async fn price_for(&self, name: &str) -> Option<RealProductData> {
        if let Some(cached) = self.cache.get(name).await {
            return Some(cached);
        }

        match self.oracle.lookup(name).await {
            Some(data) => {
                self.cache.insert(name, data.clone()).await;
                Some(data)
            }
            None => {
                debug!(event_name = "substitution.oracle.no_data", ingredient = name, "oracle returned no data");
                None
            }
        }
    }

    /// Fetch all distinct, not-yet-cached names concurrently and warm the
    /// cache. Names are deduplicated before spawning, so one prefetch
    /// never issues two oracle calls for the same name.
    pub async fn prefetch(&self, names: impl IntoIterator<Item = String>) {
        let mut pending: HashSet<String> = HashSet::new();
        for name in names {
            pending.insert(canonical_name(&name));
        }

        let mut lookups = JoinSet::new();
        for name in pending {
            if self.cache.get(&name).await.is_some() {
                continue;
            }
            let oracle = Arc::clone(&self.oracle);
            lookups.spawn(async move {
                let data = oracle.lookup(&name).await;
                (name, data)
            });
        }

        while let Some(joined) = lookups.join_next().await {
            if let Ok((name, Some(data))) = joined {
                self.cache.insert(&name, data).await;
            }
        }
    }
}
