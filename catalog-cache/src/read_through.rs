use crate::domain::{OrderBy, QueryParams, Record};
use crate::keys;
use crate::ports::DataSource;
use dashmap::DashMap;
use shared::config::CacheConfig;
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

struct CacheEntry {
    value: Vec<Record>,
    stored_at: Instant,
}

/// Read-through cache over a [`DataSource`].
///
/// Each logical query is memoized under a deterministic key. A fresh entry is
/// served without touching the source; a stale or missing entry triggers a
/// refetch. A failing refetch is swallowed: callers get the previous value
/// (even stale) or an empty list, never an error. Listing pages prefer
/// showing slightly old data over breaking.
///
/// Construct once at startup and share via `Arc`; write paths are expected to
/// call [`ReadThroughCache::invalidate`] for the resources they touch.
pub struct ReadThroughCache {
    source: Arc<dyn DataSource>,
    config: CacheConfig,
    entries: DashMap<String, CacheEntry>,
}

impl ReadThroughCache {
    /// Invalid configuration is rejected here, never at query time.
    pub fn new(source: Arc<dyn DataSource>, config: CacheConfig) -> Result<Self> {
        if config.ttl.0 == 0 {
            return Err(Error::InvalidConfig("ttl must be greater than zero".to_string()));
        }
        Ok(Self {
            source,
            config,
            entries: DashMap::new(),
        })
    }

    /// Run a logical query through the cache.
    ///
    /// `query_spec` is the field selection (`"*"` or a column list); `params`
    /// distinguish entries and may carry an explicit `limit`. With
    /// `force_refresh` the source is always consulted, regardless of
    /// freshness.
    pub async fn query(
        &self,
        resource: &str,
        query_spec: &str,
        params: &QueryParams,
        force_refresh: bool,
    ) -> Vec<Record> {
        let key = keys::cache_key(resource, query_spec, params);

        if !force_refresh {
            // Guard must not be held across the fetch below.
            if let Some(entry) = self.entries.get(&key) {
                if entry.stored_at.elapsed() < self.config.ttl.as_duration() {
                    debug!(resource, key = %key, "cache hit");
                    return entry.value.clone();
                }
            }
        }

        let limit = params.limit.unwrap_or(self.config.default_limit);
        let order = OrderBy::descending(self.config.order_field.clone());
        debug!(resource, key = %key, limit, "cache miss, fetching");

        match self.source.fetch(resource, query_spec, limit, &order).await {
            Ok(records) => {
                self.store(key, records.clone());
                records
            }
            // Zero rows is a valid result, cached like any other value.
            Err(Error::NotFound) => {
                self.store(key, Vec::new());
                Vec::new()
            }
            Err(err) => {
                warn!(resource, key = %key, error = %err, "fetch failed, serving cached data");
                match self.entries.get(&key) {
                    Some(entry) => entry.value.clone(),
                    None => Vec::new(),
                }
            }
        }
    }

    /// Drop every entry belonging to `resource`. Idempotent.
    pub fn invalidate(&self, resource: &str) {
        let prefix = keys::resource_prefix(resource);
        self.entries.retain(|key, _| !key.starts_with(&prefix));
        debug!(resource, "invalidated resource entries");
    }

    /// Drop all entries. Idempotent.
    pub fn invalidate_all(&self) {
        self.entries.clear();
        debug!("invalidated all entries");
    }

    /// Number of live entries (fresh or stale).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&self, key: String, value: Vec<Record>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .finish()
    }
}
