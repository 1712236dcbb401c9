//! Read-path cache.
//!
//! Named regions, each an LRU of JSON values with a per-region TTL. Read
//! services go through [`CacheAside`]; admin writes invalidate through the
//! same handle.
//!
//! ```toml
//! [cache]
//! enabled = true
//! capacity = 1000
//! default_ttl_seconds = 600
//! ```

mod aside;
mod config;
pub mod keys;
mod lock;
mod store;

pub use aside::{CacheAside, CacheError};
pub use config::{CacheConfig, CacheRegion};
pub use store::{CacheStore, InMemoryCacheStore};

pub(crate) const METRIC_CACHE_HIT: &str = "travelpro_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "travelpro_cache_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "travelpro_cache_evict_total";
