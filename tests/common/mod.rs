#![allow(dead_code)]

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value as JsonValue;
use time::{Duration as TimeDuration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

use travelpro::application::admin::AdminDestinationService;
use travelpro::application::auth::{AuthService, JwtCodec, hash_password};
use travelpro::application::blog::BlogService;
use travelpro::application::destinations::DestinationService;
use travelpro::application::pagination::{Page, PageRequest, SortDirection};
use travelpro::application::repos::{
    BlogRepo, CreateDestinationParams, DestinationFilter, DestinationFlag, DestinationsRepo,
    DestinationsWriteRepo, GeographyRepo, NewCountry, NewUser, RepoError,
    UpdateDestinationParams, UsersRepo,
};
use travelpro::application::seeding::{
    CountrySeedingService, CountrySource, PopulationService, SeedError,
};
use travelpro::cache::{CacheAside, CacheConfig, CacheStore, InMemoryCacheStore};
use travelpro::domain::entities::{
    BlogCategoryRecord, BlogPostAggregate, BlogPostRecord, CityPath, CityRecord, CountryRecord,
    DestinationAggregate, DestinationRecord, StateRecord, UserRecord,
};
use travelpro::domain::types::UserRole;
use travelpro::infra::http::{HealthProbe, HttpState, build_router};

pub const JWT_SECRET: &str = "integration-test-secret-with-32-bytes";
pub const PASSWORD: &str = "correct-horse-battery";

#[derive(Default)]
struct Tables {
    countries: Vec<CountryRecord>,
    states: Vec<StateRecord>,
    cities: Vec<CityRecord>,
    destinations: Vec<DestinationRecord>,
    categories: Vec<BlogCategoryRecord>,
    posts: Vec<BlogPostRecord>,
    users: Vec<UserRecord>,
}

impl Tables {
    fn city_path(&self, city_id: Uuid) -> Option<CityPath> {
        let city = self.cities.iter().find(|c| c.id == city_id)?.clone();
        let state = self.states.iter().find(|s| s.id == city.state_id)?.clone();
        let country = self
            .countries
            .iter()
            .find(|c| c.id == state.country_id)?
            .clone();
        Some(CityPath {
            city,
            state,
            country,
        })
    }

    fn aggregate(&self, record: &DestinationRecord) -> Result<DestinationAggregate, RepoError> {
        let location = self
            .city_path(record.city_id)
            .ok_or_else(|| RepoError::Integrity {
                message: format!("destination {} has no city", record.id),
            })?;
        Ok(DestinationAggregate {
            destination: record.clone(),
            location,
            attractions: Vec::new(),
            images: Vec::new(),
            budgets: Vec::new(),
            weather: Vec::new(),
        })
    }

    fn post_aggregate(&self, post: &BlogPostRecord) -> BlogPostAggregate {
        let category = post.category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id && c.is_active)
                .cloned()
        });
        BlogPostAggregate {
            post: post.clone(),
            category,
        }
    }
}

/// Every repository trait over shared in-memory tables, with a read counter.
#[derive(Default)]
pub struct FakeRepositories {
    tables: Mutex<Tables>,
    reads: AtomicUsize,
}

impl FakeRepositories {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of read-side finder calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_city(&self, country: &str, state: &str, city: &str) -> Uuid {
        let mut tables = self.tables.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let country_id = match tables.countries.iter().find(|c| c.name == country) {
            Some(existing) => existing.id,
            None => {
                let id = Uuid::new_v4();
                tables.countries.push(CountryRecord {
                    id,
                    name: country.to_string(),
                    code: country.chars().take(3).collect::<String>().to_uppercase(),
                    currency: None,
                    language: None,
                    timezone: None,
                    created_at: now,
                });
                id
            }
        };
        let state_id = Uuid::new_v4();
        tables.states.push(StateRecord {
            id: state_id,
            country_id,
            name: state.to_string(),
            code: None,
            created_at: now,
        });
        let city_id = Uuid::new_v4();
        tables.cities.push(city_record(city_id, state_id, city, now));
        city_id
    }

    pub fn add_destination(&self, record: DestinationRecord) -> Uuid {
        let id = record.id;
        self.tables.lock().unwrap().destinations.push(record);
        id
    }

    pub fn destination(&self, id: Uuid) -> Option<DestinationRecord> {
        self.tables
            .lock()
            .unwrap()
            .destinations
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub fn destination_count(&self) -> usize {
        self.tables.lock().unwrap().destinations.len()
    }

    pub fn country_count(&self) -> usize {
        self.tables.lock().unwrap().countries.len()
    }

    pub fn add_category(&self, name: &str, slug: &str, sort_order: i32, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.tables
            .lock()
            .unwrap()
            .categories
            .push(BlogCategoryRecord {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                description: None,
                sort_order,
                is_active,
                created_at: OffsetDateTime::now_utc(),
            });
        id
    }

    pub fn add_post(&self, record: BlogPostRecord) -> Uuid {
        let id = record.id;
        self.tables.lock().unwrap().posts.push(record);
        id
    }

    pub fn add_user(&self, email: &str, role: UserRole, is_active: bool) -> UserRecord {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).expect("hash password"),
            first_name: Some("Test".to_string()),
            last_name: None,
            phone: None,
            date_of_birth: None,
            profile_image_url: None,
            role,
            is_active,
            email_verified: false,
            created_at: OffsetDateTime::now_utc(),
            last_login: None,
        };
        self.tables.lock().unwrap().users.push(record.clone());
        record
    }

    fn destination_page(
        &self,
        request: &PageRequest,
        keep: impl Fn(&Tables, &DestinationRecord) -> bool,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<DestinationRecord> = tables
            .destinations
            .iter()
            .filter(|d| d.is_active && keep(&tables, d))
            .cloned()
            .collect();
        let sort = request.sort();
        rows.sort_by(|a, b| {
            let ordering = match sort.field() {
                "rating" => a.rating.partial_cmp(&b.rating).unwrap_or(CmpOrdering::Equal),
                "reviewCount" => a.review_count.cmp(&b.review_count),
                "category" => a.category.cmp(&b.category),
                "createdAt" => a.created_at.cmp(&b.created_at),
                "updatedAt" => a.updated_at.cmp(&b.updated_at),
                _ => a.name.cmp(&b.name),
            };
            let ordering = match sort.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
        let total = rows.len() as u64;
        let content = rows
            .iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .map(|row| tables.aggregate(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(content, request, total))
    }

    fn post_page(
        &self,
        request: &PageRequest,
        keep: impl Fn(&BlogPostRecord) -> bool,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<BlogPostRecord> = tables
            .posts
            .iter()
            .filter(|p| p.is_published && keep(p))
            .cloned()
            .collect();
        let sort = request.sort();
        rows.sort_by(|a, b| {
            let ordering = match sort.field() {
                "title" => a.title.cmp(&b.title),
                "readTime" => a.read_time.cmp(&b.read_time),
                "createdAt" => a.created_at.cmp(&b.created_at),
                _ => a.published_at.cmp(&b.published_at),
            };
            match sort.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        let total = rows.len() as u64;
        let content = rows
            .iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .map(|row| tables.post_aggregate(row))
            .collect();
        Ok(Page::new(content, request, total))
    }
}

fn city_record(id: Uuid, state_id: Uuid, name: &str, now: OffsetDateTime) -> CityRecord {
    CityRecord {
        id,
        state_id,
        name: name.to_string(),
        latitude: None,
        longitude: None,
        population: None,
        elevation: None,
        created_at: now,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl DestinationsRepo for FakeRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DestinationAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        tables
            .destinations
            .iter()
            .find(|d| d.id == id && d.is_active)
            .map(|d| tables.aggregate(d))
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<DestinationAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        tables
            .destinations
            .iter()
            .find(|d| d.slug == slug && d.is_active)
            .map(|d| tables.aggregate(d))
            .transpose()
    }

    async fn find_active_page(
        &self,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(page, |_, _| true)
    }

    async fn find_by_category_page(
        &self,
        category: &str,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(page, |_, d| d.category == category)
    }

    async fn search_page(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(page, |tables, d| {
            let location = tables.city_path(d.city_id);
            contains_ci(&d.name, query)
                || contains_ci(&d.description, query)
                || contains_ci(&d.category, query)
                || location.is_some_and(|path| {
                    contains_ci(&path.city.name, query)
                        || contains_ci(&path.state.name, query)
                        || contains_ci(&path.country.name, query)
                })
        })
    }

    async fn find_with_filters(
        &self,
        filter: &DestinationFilter,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(page, |tables, d| {
            let category_ok = filter
                .category
                .as_deref()
                .is_none_or(|category| d.category == category);
            let country_ok = filter.country.as_deref().is_none_or(|country| {
                tables
                    .city_path(d.city_id)
                    .is_some_and(|path| path.country.name == country)
            });
            category_ok && country_ok
        })
    }

    async fn find_featured(&self) -> Result<Vec<DestinationAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<&DestinationRecord> = tables
            .destinations
            .iter()
            .filter(|d| d.is_featured && d.is_active)
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows.into_iter().map(|d| tables.aggregate(d)).collect()
    }

    async fn top_n_by_rating(
        &self,
        n: u32,
        active_only: bool,
    ) -> Result<Vec<DestinationAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<&DestinationRecord> = tables
            .destinations
            .iter()
            .filter(|d| !active_only || d.is_active)
            .collect();
        rows.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(CmpOrdering::Equal)
                .then_with(|| b.review_count.cmp(&a.review_count))
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.into_iter()
            .take(n as usize)
            .map(|d| tables.aggregate(d))
            .collect()
    }

    async fn all_categories(&self) -> Result<Vec<String>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut categories: Vec<String> = tables
            .destinations
            .iter()
            .filter(|d| d.is_active)
            .map(|d| d.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[async_trait]
impl DestinationsWriteRepo for FakeRepositories {
    async fn load_for_admin(&self, id: Uuid) -> Result<Option<DestinationAggregate>, RepoError> {
        let tables = self.tables.lock().unwrap();
        tables
            .destinations
            .iter()
            .find(|d| d.id == id)
            .map(|d| tables.aggregate(d))
            .transpose()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.destinations.iter().any(|d| d.slug == slug))
    }

    async fn create_destination(
        &self,
        params: CreateDestinationParams,
    ) -> Result<DestinationRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.destinations.iter().any(|d| d.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "destinations_slug_key".to_string(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let record = DestinationRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            city_id: params.city_id,
            category: params.category,
            description: params.description,
            short_description: params.short_description,
            main_image_url: params.main_image_url,
            rating: params.rating,
            review_count: params.review_count,
            best_time_to_visit: params.best_time_to_visit,
            recommended_duration: params.recommended_duration,
            difficulty_level: params.difficulty_level,
            accessibility_info: params.accessibility_info,
            history: params.history,
            culture: params.culture,
            interesting_facts: params.interesting_facts,
            latitude: params.latitude,
            longitude: params.longitude,
            is_featured: params.is_featured,
            is_active: params.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.destinations.push(record.clone());
        Ok(record)
    }

    async fn update_destination(
        &self,
        params: UpdateDestinationParams,
    ) -> Result<DestinationRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .destinations
            .iter_mut()
            .find(|d| d.id == params.id)
            .ok_or(RepoError::NotFound)?;
        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(category) = params.category {
            record.category = category;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if params.short_description.is_some() {
            record.short_description = params.short_description;
        }
        if params.main_image_url.is_some() {
            record.main_image_url = params.main_image_url;
        }
        if params.best_time_to_visit.is_some() {
            record.best_time_to_visit = params.best_time_to_visit;
        }
        if params.recommended_duration.is_some() {
            record.recommended_duration = params.recommended_duration;
        }
        if params.difficulty_level.is_some() {
            record.difficulty_level = params.difficulty_level;
        }
        if params.accessibility_info.is_some() {
            record.accessibility_info = params.accessibility_info;
        }
        if params.history.is_some() {
            record.history = params.history;
        }
        if params.culture.is_some() {
            record.culture = params.culture;
        }
        if params.latitude.is_some() {
            record.latitude = params.latitude;
        }
        if params.longitude.is_some() {
            record.longitude = params.longitude;
        }
        if let Some(featured) = params.is_featured {
            record.is_featured = featured;
        }
        if let Some(active) = params.is_active {
            record.is_active = active;
        }
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn toggle_flag(
        &self,
        id: Uuid,
        flag: DestinationFlag,
    ) -> Result<DestinationRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let record = tables
            .destinations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RepoError::NotFound)?;
        match flag {
            DestinationFlag::Featured => record.is_featured = !record.is_featured,
            DestinationFlag::Active => record.is_active = !record.is_active,
        }
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn delete_destination(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.destinations.len();
        tables.destinations.retain(|d| d.id != id);
        Ok(tables.destinations.len() < before)
    }
}

#[async_trait]
impl GeographyRepo for FakeRepositories {
    async fn find_city(&self, id: Uuid) -> Result<Option<CityPath>, RepoError> {
        Ok(self.tables.lock().unwrap().city_path(id))
    }

    async fn insert_country_if_absent(&self, country: NewCountry) -> Result<bool, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .countries
            .iter()
            .any(|c| c.code == country.code || c.name == country.name)
        {
            return Ok(false);
        }
        tables.countries.push(country_record(country));
        Ok(true)
    }

    async fn get_or_create_country(&self, country: NewCountry) -> Result<CountryRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.countries.iter().find(|c| c.code == country.code) {
            return Ok(existing.clone());
        }
        let record = country_record(country);
        tables.countries.push(record.clone());
        Ok(record)
    }

    async fn get_or_create_state(
        &self,
        country_id: Uuid,
        name: &str,
    ) -> Result<StateRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .states
            .iter()
            .find(|s| s.country_id == country_id && s.name == name)
        {
            return Ok(existing.clone());
        }
        let record = StateRecord {
            id: Uuid::new_v4(),
            country_id,
            name: name.to_string(),
            code: None,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.states.push(record.clone());
        Ok(record)
    }

    async fn get_or_create_city(
        &self,
        state_id: Uuid,
        name: &str,
    ) -> Result<CityRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .cities
            .iter()
            .find(|c| c.state_id == state_id && c.name == name)
        {
            return Ok(existing.clone());
        }
        let record = city_record(Uuid::new_v4(), state_id, name, OffsetDateTime::now_utc());
        tables.cities.push(record.clone());
        Ok(record)
    }
}

fn country_record(country: NewCountry) -> CountryRecord {
    CountryRecord {
        id: Uuid::new_v4(),
        name: country.name,
        code: country.code,
        currency: country.currency,
        language: country.language,
        timezone: country.timezone,
        created_at: OffsetDateTime::now_utc(),
    }
}

#[async_trait]
impl BlogRepo for FakeRepositories {
    async fn find_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogPostAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.slug == slug && p.is_published)
            .map(|p| tables.post_aggregate(p)))
    }

    async fn find_published_page(
        &self,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.post_page(page, |_| true)
    }

    async fn find_posts_by_category_page(
        &self,
        category_id: Uuid,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.post_page(page, |p| p.category_id == Some(category_id))
    }

    async fn search_posts_page(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<BlogPostAggregate>, RepoError> {
        self.post_page(page, |p| {
            contains_ci(&p.title, query)
                || contains_ci(&p.content, query)
                || p.excerpt.as_deref().is_some_and(|e| contains_ci(e, query))
        })
    }

    async fn find_featured_posts(&self) -> Result<Vec<BlogPostAggregate>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<&BlogPostRecord> = tables
            .posts
            .iter()
            .filter(|p| p.is_published && p.is_featured)
            .collect();
        rows.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(rows.into_iter().map(|p| tables.post_aggregate(p)).collect())
    }

    async fn active_categories(&self) -> Result<Vec<BlogCategoryRecord>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<BlogCategoryRecord> = tables
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.sort_order);
        Ok(rows)
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogCategoryRecord>, RepoError> {
        self.read();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .iter()
            .find(|c| c.slug == slug && c.is_active)
            .cloned())
    }
}

#[async_trait]
impl UsersRepo for FakeRepositories {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            date_of_birth: user.date_of_birth,
            profile_image_url: None,
            role: user.role,
            is_active: true,
            email_verified: false,
            created_at: OffsetDateTime::now_utc(),
            last_login: None,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> Result<UserRecord, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepoError::NotFound)?;
        user.last_login = Some(at);
        Ok(user.clone())
    }
}

/// Country source returning a fixed list, or failing when `fail` is set.
pub struct StaticCountrySource {
    pub countries: Vec<NewCountry>,
    pub fail: bool,
}

#[async_trait]
impl CountrySource for StaticCountrySource {
    async fn fetch_countries(&self) -> Result<Vec<NewCountry>, SeedError> {
        if self.fail {
            return Err(SeedError::Upstream("connection refused".to_string()));
        }
        Ok(self.countries.clone())
    }
}

pub fn new_country(name: &str, code: &str) -> NewCountry {
    NewCountry {
        name: name.to_string(),
        code: code.to_string(),
        currency: None,
        language: None,
        timezone: None,
    }
}

pub struct FixedHealth(pub Result<(), String>);

#[async_trait]
impl HealthProbe for FixedHealth {
    async fn check(&self) -> Result<(), String> {
        self.0.clone()
    }
}

pub fn destination_record(
    city_id: Uuid,
    name: &str,
    slug: &str,
    category: &str,
    rating: f64,
) -> DestinationRecord {
    let now = OffsetDateTime::now_utc();
    DestinationRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: slug.to_string(),
        city_id,
        category: category.to_string(),
        description: format!("{name} description"),
        short_description: None,
        main_image_url: None,
        rating,
        review_count: 0,
        best_time_to_visit: None,
        recommended_duration: None,
        difficulty_level: None,
        accessibility_info: None,
        history: None,
        culture: None,
        interesting_facts: Vec::new(),
        latitude: None,
        longitude: None,
        is_featured: false,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn post_record(
    title: &str,
    slug: &str,
    category_id: Option<Uuid>,
    published_days_ago: Option<i64>,
) -> BlogPostRecord {
    let now = OffsetDateTime::now_utc();
    BlogPostRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: None,
        content: format!("{title} body"),
        author_name: Some("Editor".to_string()),
        author_id: None,
        category_id,
        featured_image_url: None,
        read_time: Some(5),
        tags: Vec::new(),
        meta_description: None,
        is_published: published_days_ago.is_some(),
        is_featured: false,
        published_at: published_days_ago.map(|days| now - TimeDuration::days(days)),
        created_at: now,
        updated_at: now,
    }
}

pub struct TestApp {
    pub router: Router,
    pub repos: Arc<FakeRepositories>,
    pub jwt: JwtCodec,
}

impl TestApp {
    pub fn new(repos: Arc<FakeRepositories>) -> Self {
        Self::with_source(
            repos,
            StaticCountrySource {
                countries: Vec::new(),
                fail: false,
            },
        )
    }

    pub fn with_source(repos: Arc<FakeRepositories>, source: StaticCountrySource) -> Self {
        let config = CacheConfig::default();
        let store: Arc<dyn CacheStore> = Arc::new(InMemoryCacheStore::new(&config));
        let cache = CacheAside::new(store, config);
        let jwt = JwtCodec::new(JWT_SECRET, "travelpro", TimeDuration::hours(1));

        let seeding = CountrySeedingService::new(Arc::new(source), repos.clone());
        let state = HttpState {
            destinations: Arc::new(DestinationService::new(repos.clone(), cache.clone(), 100)),
            blog: Arc::new(BlogService::new(repos.clone(), cache.clone(), 100)),
            admin: Arc::new(AdminDestinationService::new(
                repos.clone(),
                repos.clone(),
                cache.clone(),
            )),
            auth: Arc::new(AuthService::new(repos.clone(), jwt.clone())),
            population: Arc::new(PopulationService::new(
                repos.clone(),
                repos.clone(),
                cache,
                seeding,
            )),
            health: Arc::new(FixedHealth(Ok(()))),
        };

        Self {
            router: build_router(state),
            repos,
            jwt,
        }
    }

    pub fn token_for(&self, user: &UserRecord) -> String {
        self.jwt.issue(user).expect("issue token")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, JsonValue) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, JsonValue) {
        let (status, bytes) = self.send_raw(request).await;
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, bytes.to_vec())
    }
}

pub fn authorized(method: &str, uri: &str, token: &str, body: Option<JsonValue>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
