//! Cache regions and their time-to-live settings.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// A named partition of the cache with its own TTL and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    Destinations,
    Destination,
    FeaturedDestinations,
    TopDestinations,
    DestinationCategories,
    BlogPosts,
    BlogPost,
    FeaturedBlogPosts,
    BlogCategories,
    BlogCategory,
}

impl CacheRegion {
    pub const ALL: [CacheRegion; 10] = [
        CacheRegion::Destinations,
        CacheRegion::Destination,
        CacheRegion::FeaturedDestinations,
        CacheRegion::TopDestinations,
        CacheRegion::DestinationCategories,
        CacheRegion::BlogPosts,
        CacheRegion::BlogPost,
        CacheRegion::FeaturedBlogPosts,
        CacheRegion::BlogCategories,
        CacheRegion::BlogCategory,
    ];

    /// Region lists cleared whenever any destination changes.
    pub const DESTINATION_LISTS: [CacheRegion; 4] = [
        CacheRegion::Destinations,
        CacheRegion::FeaturedDestinations,
        CacheRegion::TopDestinations,
        CacheRegion::DestinationCategories,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CacheRegion::Destinations => "destinations",
            CacheRegion::Destination => "destination",
            CacheRegion::FeaturedDestinations => "featuredDestinations",
            CacheRegion::TopDestinations => "topDestinations",
            CacheRegion::DestinationCategories => "destinationCategories",
            CacheRegion::BlogPosts => "blogPosts",
            CacheRegion::BlogPost => "blogPost",
            CacheRegion::FeaturedBlogPosts => "featuredBlogPosts",
            CacheRegion::BlogCategories => "blogCategories",
            CacheRegion::BlogCategory => "blogCategory",
        }
    }

    /// Resolve a configured region name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.name().eq_ignore_ascii_case(name.trim()))
    }

    fn standard_ttl(self) -> Duration {
        let secs = match self {
            CacheRegion::Destinations => HOUR,
            CacheRegion::Destination => 2 * HOUR,
            CacheRegion::FeaturedDestinations | CacheRegion::TopDestinations => 6 * HOUR,
            CacheRegion::DestinationCategories => 12 * HOUR,
            CacheRegion::BlogPosts => 30 * MINUTE,
            CacheRegion::BlogPost => HOUR,
            CacheRegion::FeaturedBlogPosts => 2 * HOUR,
            CacheRegion::BlogCategories | CacheRegion::BlogCategory => 12 * HOUR,
        };
        Duration::from_secs(secs)
    }
}

impl fmt::Display for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum entries held per region.
    pub capacity: usize,
    /// TTL for regions without an explicit entry in `region_ttls`.
    pub default_ttl: Duration,
    pub region_ttls: HashMap<CacheRegion, Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_CAPACITY,
            default_ttl: DEFAULT_TTL,
            region_ttls: standard_region_ttls(),
        }
    }
}

/// A configured `cache.ttl` table replaces the standard table; regions it
/// leaves out use `default_ttl`.
impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            capacity: settings.capacity.get() as usize,
            default_ttl: Duration::from_secs(u64::from(settings.default_ttl_seconds.get())),
            region_ttls: settings
                .region_ttls
                .clone()
                .unwrap_or_else(standard_region_ttls),
        }
    }
}

fn standard_region_ttls() -> HashMap<CacheRegion, Duration> {
    CacheRegion::ALL
        .into_iter()
        .map(|region| (region, region.standard_ttl()))
        .collect()
}

impl CacheConfig {
    pub fn ttl_for(&self, region: CacheRegion) -> Duration {
        self.region_ttls
            .get(&region)
            .copied()
            .unwrap_or(self.default_ttl)
    }

    /// Capacity as `NonZeroUsize`, clamping zero to one.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_ttls_apply_by_default() {
        let config = CacheConfig::default();
        assert_eq!(
            config.ttl_for(CacheRegion::Destinations),
            Duration::from_secs(3600)
        );
        assert_eq!(
            config.ttl_for(CacheRegion::BlogPosts),
            Duration::from_secs(1800)
        );
        assert_eq!(
            config.ttl_for(CacheRegion::BlogCategory),
            Duration::from_secs(12 * 3600)
        );
    }

    #[test]
    fn unlisted_region_falls_back_to_default_ttl() {
        let mut config = CacheConfig::default();
        config.region_ttls.remove(&CacheRegion::TopDestinations);
        config.default_ttl = Duration::from_secs(42);
        assert_eq!(
            config.ttl_for(CacheRegion::TopDestinations),
            Duration::from_secs(42)
        );
    }

    #[test]
    fn configured_table_overrides_listed_regions_only() {
        let settings = crate::config::CacheSettings {
            enabled: true,
            capacity: std::num::NonZeroU32::MIN,
            default_ttl_seconds: std::num::NonZeroU32::new(42).expect("non-zero"),
            region_ttls: Some(HashMap::from([(
                CacheRegion::BlogPosts,
                Duration::from_secs(90),
            )])),
        };
        let config = CacheConfig::from(&settings);

        assert_eq!(config.ttl_for(CacheRegion::BlogPosts), Duration::from_secs(90));
        for region in CacheRegion::ALL {
            if region != CacheRegion::BlogPosts {
                assert_eq!(config.ttl_for(region), Duration::from_secs(42), "{region}");
            }
        }
    }

    #[test]
    fn missing_table_keeps_standard_ttls() {
        let settings = crate::config::CacheSettings {
            enabled: true,
            capacity: std::num::NonZeroU32::MIN,
            default_ttl_seconds: std::num::NonZeroU32::new(42).expect("non-zero"),
            region_ttls: None,
        };
        let config = CacheConfig::from(&settings);
        assert_eq!(
            config.ttl_for(CacheRegion::FeaturedDestinations),
            Duration::from_secs(6 * 3600)
        );
    }

    #[test]
    fn region_names_resolve_case_insensitively() {
        assert_eq!(
            CacheRegion::from_name("featuredblogposts"),
            Some(CacheRegion::FeaturedBlogPosts)
        );
        assert_eq!(CacheRegion::from_name("blogCategory"), Some(CacheRegion::BlogCategory));
        assert_eq!(CacheRegion::from_name("comments"), None);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let config = CacheConfig {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.capacity_non_zero().get(), 1);
    }

    #[test]
    fn region_names_are_unique() {
        let mut names: Vec<_> = CacheRegion::ALL.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CacheRegion::ALL.len());
    }
}
