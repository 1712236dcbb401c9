//! Public destination read path: query, project, cache.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::application::error::ReadError;
use crate::application::pagination::{DESTINATION_SORT, Page, PageParams, PageRequest};
use crate::application::projection::{DestinationDto, destination_dto};
use crate::application::repos::{DestinationFilter, DestinationsRepo};
use crate::cache::{CacheAside, CacheRegion, keys};

/// Size of the "top destinations" list.
pub const TOP_DESTINATIONS: u32 = 6;

#[derive(Clone)]
pub struct DestinationService {
    repo: Arc<dyn DestinationsRepo>,
    cache: CacheAside,
    max_page_size: u32,
}

impl DestinationService {
    pub fn new(repo: Arc<dyn DestinationsRepo>, cache: CacheAside, max_page_size: u32) -> Self {
        Self {
            repo,
            cache,
            max_page_size,
        }
    }

    fn page_request(&self, params: &PageParams) -> Result<PageRequest, ReadError> {
        Ok(PageRequest::normalize(
            params,
            &DESTINATION_SORT,
            self.max_page_size,
        )?)
    }

    pub async fn list_active(&self, params: &PageParams) -> Result<Page<DestinationDto>, ReadError> {
        let request = self.page_request(params)?;
        self.cache
            .get_or_load(CacheRegion::Destinations, keys::page(&request), || async {
                let page = self.repo.find_active_page(&request).await?;
                Ok::<_, ReadError>(page.map(|aggregate| destination_dto(&aggregate)))
            })
            .await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<DestinationDto>, ReadError> {
        self.cache
            .get_or_load_optional(CacheRegion::Destination, keys::by_slug(slug), || async {
                let found = self.repo.find_by_slug(slug).await?;
                Ok::<_, ReadError>(found.as_ref().map(destination_dto))
            })
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<DestinationDto>, ReadError> {
        self.cache
            .get_or_load_optional(CacheRegion::Destination, keys::by_id(id), || async {
                let found = self.repo.find_by_id(id).await?;
                Ok::<_, ReadError>(found.as_ref().map(destination_dto))
            })
            .await
    }

    pub async fn featured(&self) -> Result<Vec<DestinationDto>, ReadError> {
        self.cache
            .get_or_load(
                CacheRegion::FeaturedDestinations,
                keys::ALL.to_string(),
                || async {
                    let rows = self.repo.find_featured().await?;
                    Ok::<_, ReadError>(rows.iter().map(destination_dto).collect())
                },
            )
            .await
    }

    pub async fn top(&self) -> Result<Vec<DestinationDto>, ReadError> {
        self.cache
            .get_or_load(CacheRegion::TopDestinations, keys::ALL.to_string(), || async {
                let rows = self.repo.top_n_by_rating(TOP_DESTINATIONS, true).await?;
                Ok::<_, ReadError>(rows.iter().map(destination_dto).collect())
            })
            .await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ReadError> {
        self.cache
            .get_or_load(
                CacheRegion::DestinationCategories,
                keys::ALL.to_string(),
                || async { Ok::<_, ReadError>(self.repo.all_categories().await?) },
            )
            .await
    }

    pub async fn search(
        &self,
        query: &str,
        params: &PageParams,
    ) -> Result<Page<DestinationDto>, ReadError> {
        let request = self.page_request(params)?;
        debug!(
            target = "travelpro::destinations",
            query,
            page = %request.cache_key(),
            "searching destinations"
        );
        let page = self.repo.search_page(query.trim(), &request).await?;
        Ok(page.map(|aggregate| destination_dto(&aggregate)))
    }

    pub async fn by_category(
        &self,
        category: &str,
        params: &PageParams,
    ) -> Result<Page<DestinationDto>, ReadError> {
        let request = self.page_request(params)?;
        let page = self.repo.find_by_category_page(category, &request).await?;
        Ok(page.map(|aggregate| destination_dto(&aggregate)))
    }

    /// Blank filter values are treated as absent.
    pub async fn filter(
        &self,
        category: Option<&str>,
        country: Option<&str>,
        params: &PageParams,
    ) -> Result<Page<DestinationDto>, ReadError> {
        let request = self.page_request(params)?;
        let filter = DestinationFilter {
            category: non_blank(category),
            country: non_blank(country),
        };
        let page = self.repo.find_with_filters(&filter, &request).await?;
        Ok(page.map(|aggregate| destination_dto(&aggregate)))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
