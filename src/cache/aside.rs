use std::future::Future;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::{CacheConfig, CacheRegion};
use super::store::CacheStore;
use super::{METRIC_CACHE_HIT, METRIC_CACHE_MISS};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode value for cache region `{region}`: {source}")]
    Encode {
        region: CacheRegion,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-through helper: consult the store, otherwise load and populate.
///
/// Loader errors are never cached. A stored value that no longer decodes
/// is treated as a miss and replaced.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    config: Arc<CacheConfig>,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        region: CacheRegion,
        key: String,
        load: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.lookup(region, &key) {
            return Ok(hit);
        }
        let value = load().await?;
        self.populate(region, key, &value)?;
        Ok(value)
    }

    /// Like [`get_or_load`](Self::get_or_load), but an absent result is
    /// returned without being stored.
    pub async fn get_or_load_optional<T, E, F, Fut>(
        &self,
        region: CacheRegion,
        key: String,
        load: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let Some(hit) = self.lookup(region, &key) {
            return Ok(Some(hit));
        }
        let Some(value) = load().await? else {
            return Ok(None);
        };
        self.populate(region, key, &value)?;
        Ok(Some(value))
    }

    pub fn evict(&self, region: CacheRegion, key: &str) {
        self.store.invalidate(region, key);
    }

    pub fn clear_region(&self, region: CacheRegion) {
        debug!(target = "travelpro::cache", region = region.name(), "region cleared");
        self.store.invalidate_region(region);
    }

    fn lookup<T: DeserializeOwned>(&self, region: CacheRegion, key: &str) -> Option<T> {
        let Some(raw) = self.store.get(region, key) else {
            counter!(METRIC_CACHE_MISS, "region" => region.name()).increment(1);
            return None;
        };
        match serde_json::from_value(raw) {
            Ok(value) => {
                counter!(METRIC_CACHE_HIT, "region" => region.name()).increment(1);
                Some(value)
            }
            Err(err) => {
                warn!(
                    target = "travelpro::cache",
                    region = region.name(),
                    key,
                    error = %err,
                    "discarding undecodable cache entry"
                );
                self.store.invalidate(region, key);
                counter!(METRIC_CACHE_MISS, "region" => region.name()).increment(1);
                None
            }
        }
    }

    fn populate<T: Serialize>(
        &self,
        region: CacheRegion,
        key: String,
        value: &T,
    ) -> Result<(), CacheError> {
        let encoded =
            serde_json::to_value(value).map_err(|source| CacheError::Encode { region, source })?;
        self.store
            .put(region, key, encoded, self.config.ttl_for(region));
        Ok(())
    }
}
