//! Repository traits describing persistence adapters.
//!
//! Each trait exposes only the finders the services need. Read finders
//! restricted to public visibility (active destinations, published posts,
//! active categories) say so in their docs; the write-side traits are the
//! only place inactive rows can be reached.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::domain::entities::{
    BlogCategoryRecord, BlogPostAggregate, CityPath, CityRecord, CountryRecord,
    DestinationAggregate, DestinationRecord, StateRecord, UserRecord,
};
use crate::domain::types::UserRole;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Optional listing filters; `None` matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationFilter {
    pub category: Option<String>,
    /// Matched against the country *name* of the destination's city.
    pub country: Option<String>,
}

/// Read-side query layer for destinations. Every finder sees active rows only.
#[async_trait]
pub trait DestinationsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DestinationAggregate>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<DestinationAggregate>, RepoError>;

    async fn find_active_page(
        &self,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError>;

    async fn find_by_category_page(
        &self,
        category: &str,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError>;

    /// Case-insensitive substring match over name, description, category and
    /// the city/state/country names.
    async fn search_page(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError>;

    async fn find_with_filters(
        &self,
        filter: &DestinationFilter,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError>;

    /// Featured destinations ordered by name.
    async fn find_featured(&self) -> Result<Vec<DestinationAggregate>, RepoError>;

    async fn top_n_by_rating(
        &self,
        n: u32,
        active_only: bool,
    ) -> Result<Vec<DestinationAggregate>, RepoError>;

    /// Distinct categories of active destinations in ascending order.
    async fn all_categories(&self) -> Result<Vec<String>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateDestinationParams {
    pub name: String,
    pub slug: String,
    pub city_id: Uuid,
    pub category: String,
    pub description: String,
    pub short_description: Option<String>,
    pub main_image_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub best_time_to_visit: Option<String>,
    pub recommended_duration: Option<String>,
    pub difficulty_level: Option<String>,
    pub accessibility_info: Option<String>,
    pub history: Option<String>,
    pub culture: Option<String>,
    pub interesting_facts: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_featured: bool,
    pub is_active: bool,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateDestinationParams {
    pub id: Uuid,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub main_image_url: Option<String>,
    pub best_time_to_visit: Option<String>,
    pub recommended_duration: Option<String>,
    pub difficulty_level: Option<String>,
    pub accessibility_info: Option<String>,
    pub history: Option<String>,
    pub culture: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationFlag {
    Featured,
    Active,
}

/// Admin-side persistence for destinations; sees inactive rows.
#[async_trait]
pub trait DestinationsWriteRepo: Send + Sync {
    async fn load_for_admin(&self, id: Uuid) -> Result<Option<DestinationAggregate>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn create_destination(
        &self,
        params: CreateDestinationParams,
    ) -> Result<DestinationRecord, RepoError>;

    /// Returns `RepoError::NotFound` when no row has the given id.
    async fn update_destination(
        &self,
        params: UpdateDestinationParams,
    ) -> Result<DestinationRecord, RepoError>;

    /// Flip one boolean column and return the updated row.
    async fn toggle_flag(
        &self,
        id: Uuid,
        flag: DestinationFlag,
    ) -> Result<DestinationRecord, RepoError>;

    /// Delete owned children and then the destination in one transaction.
    /// Returns `false` when the destination did not exist.
    async fn delete_destination(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCountry {
    pub name: String,
    pub code: String,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

#[async_trait]
pub trait GeographyRepo: Send + Sync {
    async fn find_city(&self, id: Uuid) -> Result<Option<CityPath>, RepoError>;

    /// Insert unless a country with the same code or name exists. Returns
    /// whether a row was written.
    async fn insert_country_if_absent(&self, country: NewCountry) -> Result<bool, RepoError>;

    async fn get_or_create_country(&self, country: NewCountry) -> Result<CountryRecord, RepoError>;

    async fn get_or_create_state(
        &self,
        country_id: Uuid,
        name: &str,
    ) -> Result<StateRecord, RepoError>;

    async fn get_or_create_city(&self, state_id: Uuid, name: &str)
    -> Result<CityRecord, RepoError>;
}

/// Read-side query layer for the blog. Posts are published-only and
/// categories active-only.
#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn find_post_by_slug(&self, slug: &str)
    -> Result<Option<BlogPostAggregate>, RepoError>;

    async fn find_published_page(
        &self,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError>;

    async fn find_posts_by_category_page(
        &self,
        category_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError>;

    /// Case-insensitive substring match over title, content and excerpt.
    async fn search_posts_page(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError>;

    /// Featured posts, newest first.
    async fn find_featured_posts(&self) -> Result<Vec<BlogPostAggregate>, RepoError>;

    /// Active categories ordered by `sort_order`.
    async fn active_categories(&self) -> Result<Vec<BlogCategoryRecord>, RepoError>;

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogCategoryRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub role: UserRole,
    pub preferences: JsonValue,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;

    /// Fails with `RepoError::Duplicate` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, RepoError>;

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> Result<UserRecord, RepoError>;
}
