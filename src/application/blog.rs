//! Public blog read path. Only published posts and active categories are
//! reachable from here.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::ReadError;
use crate::application::pagination::{BLOG_POST_SORT, Page, PageParams, PageRequest};
use crate::application::projection::{
    BlogCategoryDto, BlogPostDto, blog_category_dto, blog_post_dto,
};
use crate::application::repos::BlogRepo;
use crate::cache::{CacheAside, CacheRegion, keys};

#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn BlogRepo>,
    cache: CacheAside,
    max_page_size: u32,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepo>, cache: CacheAside, max_page_size: u32) -> Self {
        Self {
            repo,
            cache,
            max_page_size,
        }
    }

    fn page_request(&self, params: &PageParams) -> Result<PageRequest, ReadError> {
        Ok(PageRequest::normalize(
            params,
            &BLOG_POST_SORT,
            self.max_page_size,
        )?)
    }

    pub async fn list_published(
        &self,
        params: &PageParams,
    ) -> Result<Page<BlogPostDto>, ReadError> {
        let request = self.page_request(params)?;
        self.cache
            .get_or_load(CacheRegion::BlogPosts, keys::page(&request), || async {
                let page = self.repo.find_published_page(&request).await?;
                Ok::<_, ReadError>(page.map(|aggregate| blog_post_dto(&aggregate)))
            })
            .await
    }

    pub async fn get_post(&self, slug: &str) -> Result<Option<BlogPostDto>, ReadError> {
        self.cache
            .get_or_load_optional(CacheRegion::BlogPost, keys::by_slug(slug), || async {
                let found = self.repo.find_post_by_slug(slug).await?;
                Ok::<_, ReadError>(found.as_ref().map(blog_post_dto))
            })
            .await
    }

    pub async fn featured(&self) -> Result<Vec<BlogPostDto>, ReadError> {
        self.cache
            .get_or_load(CacheRegion::FeaturedBlogPosts, keys::ALL.to_string(), || async {
                let rows = self.repo.find_featured_posts().await?;
                Ok::<_, ReadError>(rows.iter().map(blog_post_dto).collect())
            })
            .await
    }

    pub async fn search(
        &self,
        query: &str,
        params: &PageParams,
    ) -> Result<Page<BlogPostDto>, ReadError> {
        let request = self.page_request(params)?;
        let page = self.repo.search_posts_page(query.trim(), &request).await?;
        Ok(page.map(|aggregate| blog_post_dto(&aggregate)))
    }

    pub async fn by_category(
        &self,
        category_id: Uuid,
        params: &PageParams,
    ) -> Result<Page<BlogPostDto>, ReadError> {
        let request = self.page_request(params)?;
        let page = self
            .repo
            .find_posts_by_category_page(category_id, &request)
            .await?;
        Ok(page.map(|aggregate| blog_post_dto(&aggregate)))
    }

    pub async fn categories(&self) -> Result<Vec<BlogCategoryDto>, ReadError> {
        self.cache
            .get_or_load(CacheRegion::BlogCategories, keys::ALL.to_string(), || async {
                let rows = self.repo.active_categories().await?;
                Ok::<_, ReadError>(rows.iter().map(blog_category_dto).collect())
            })
            .await
    }

    pub async fn get_category(&self, slug: &str) -> Result<Option<BlogCategoryDto>, ReadError> {
        self.cache
            .get_or_load_optional(CacheRegion::BlogCategory, keys::by_slug(slug), || async {
                let found = self.repo.find_category_by_slug(slug).await?;
                Ok::<_, ReadError>(found.as_ref().map(blog_category_dto))
            })
            .await
    }
}
