//! Key-value storage behind the cache-aside helper.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;
use serde_json::Value as JsonValue;

use super::METRIC_CACHE_EVICT;
use super::config::{CacheConfig, CacheRegion};
use super::lock::mutex_lock;

/// Region-scoped key-value store with per-entry expiry.
///
/// Implementations must be safe for concurrent use; readers may race with
/// invalidation, in which case either the old or the freshly loaded value
/// is observed.
pub trait CacheStore: Send + Sync {
    fn get(&self, region: CacheRegion, key: &str) -> Option<JsonValue>;

    fn put(&self, region: CacheRegion, key: String, value: JsonValue, ttl: Duration);

    fn invalidate(&self, region: CacheRegion, key: &str);

    fn invalidate_region(&self, region: CacheRegion);
}

struct Entry {
    value: JsonValue,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// One LRU per region. A disabled store never retains anything.
pub struct InMemoryCacheStore {
    enabled: bool,
    regions: HashMap<CacheRegion, Mutex<LruCache<String, Entry>>>,
}

impl InMemoryCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        let regions = CacheRegion::ALL
            .into_iter()
            .map(|region| {
                (
                    region,
                    Mutex::new(LruCache::new(config.capacity_non_zero())),
                )
            })
            .collect();
        Self {
            enabled: config.enabled,
            regions,
        }
    }

    /// Number of live (possibly expired but not yet purged) entries.
    pub fn len(&self, region: CacheRegion) -> usize {
        self.regions
            .get(&region)
            .map(|lock| mutex_lock(lock, region.name(), "len").len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, region: CacheRegion) -> bool {
        self.len(region) == 0
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, region: CacheRegion, key: &str) -> Option<JsonValue> {
        if !self.enabled {
            return None;
        }
        let lock = self.regions.get(&region)?;
        let mut entries = mutex_lock(lock, region.name(), "get");
        let expired = entries.get(key)?.is_expired(Instant::now());
        if expired {
            entries.pop(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn put(&self, region: CacheRegion, key: String, value: JsonValue, ttl: Duration) {
        if !self.enabled {
            return;
        }
        let Some(lock) = self.regions.get(&region) else {
            return;
        };
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = mutex_lock(lock, region.name(), "put");
        let replaced_key = key.clone();
        if let Some((evicted, _)) = entries.push(key, entry)
            && evicted != replaced_key
        {
            counter!(METRIC_CACHE_EVICT, "region" => region.name()).increment(1);
        }
    }

    fn invalidate(&self, region: CacheRegion, key: &str) {
        if let Some(lock) = self.regions.get(&region) {
            mutex_lock(lock, region.name(), "invalidate").pop(key);
        }
    }

    fn invalidate_region(&self, region: CacheRegion) {
        if let Some(lock) = self.regions.get(&region) {
            mutex_lock(lock, region.name(), "invalidate_region").clear();
        }
    }
}
