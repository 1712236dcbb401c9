use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{DestinationsWriteRepo, GeographyRepo};
use crate::cache::{CacheAside, CacheRegion, keys};

#[derive(Clone)]
pub struct AdminDestinationService {
    pub(crate) writer: Arc<dyn DestinationsWriteRepo>,
    pub(crate) geography: Arc<dyn GeographyRepo>,
    pub(crate) cache: CacheAside,
}

impl AdminDestinationService {
    pub fn new(
        writer: Arc<dyn DestinationsWriteRepo>,
        geography: Arc<dyn GeographyRepo>,
        cache: CacheAside,
    ) -> Self {
        Self {
            writer,
            geography,
            cache,
        }
    }

    /// Drop every cached view a change to this destination can affect.
    pub(crate) fn invalidate(&self, id: Uuid, slug: &str) {
        self.cache.evict(CacheRegion::Destination, &keys::by_id(id));
        self.cache.evict(CacheRegion::Destination, &keys::by_slug(slug));
        clear_destination_lists(&self.cache);
        debug!(
            target = "travelpro::admin::destinations",
            destination_id = %id,
            slug,
            "destination cache entries invalidated"
        );
    }
}

/// Clear the list-shaped destination regions.
pub fn clear_destination_lists(cache: &CacheAside) {
    for region in CacheRegion::DESTINATION_LISTS {
        cache.clear_region(region);
    }
}
