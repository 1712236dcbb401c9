//! Transfer shapes returned by the API and the pure mappings that build them.
//!
//! Every projection is a function of its input only: projecting the same
//! aggregate twice yields equal values. Optional columns stay `Option` and
//! serialize as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::entities::{
    AttractionRecord, BlogCategoryRecord, BlogPostAggregate, CityPath, CountryRecord,
    DestinationAggregate, DestinationBudgetRecord, DestinationImageRecord,
    DestinationWeatherRecord, StateRecord, UserRecord,
};
use crate::domain::types::AttractionType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDto {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub country: CountryDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub population: Option<i32>,
    pub elevation: Option<i32>,
    pub state: StateDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionDto {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub attraction_type: AttractionType,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub opening_hours: Option<String>,
    pub entry_fee: Option<String>,
    pub visit_duration: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_info: Option<JsonValue>,
    pub accessibility_info: Option<String>,
    pub best_time_to_visit: Option<String>,
    pub tips: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationImageDto {
    pub id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationBudgetDto {
    pub id: Uuid,
    pub category: String,
    pub budget_type: String,
    pub price_per_day: f64,
    pub currency: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationWeatherDto {
    pub id: Uuid,
    pub month: i16,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub rainfall: Option<f64>,
    pub humidity: Option<i32>,
    pub weather_description: Option<String>,
    pub clothing_recommendations: Vec<String>,
    pub activities_recommended: Vec<String>,
    pub travel_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub city: CityDto,
    pub category: String,
    pub description: String,
    pub short_description: Option<String>,
    pub main_image_url: Option<String>,
    pub rating: f64,
    pub review_count: i32,
    pub best_time_to_visit: Option<String>,
    pub recommended_duration: Option<String>,
    pub difficulty_level: Option<String>,
    pub history: Option<String>,
    pub culture: Option<String>,
    pub interesting_facts: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub attractions: Vec<AttractionDto>,
    pub images: Vec<DestinationImageDto>,
    pub budgets: Vec<DestinationBudgetDto>,
    pub weather: Vec<DestinationWeatherDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategoryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author_name: Option<String>,
    pub author_id: Option<Uuid>,
    pub category: Option<BlogCategoryDto>,
    pub featured_image_url: Option<String>,
    pub read_time: Option<i32>,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    pub is_active: bool,
    pub email_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: UserDto,
}

impl AuthResponse {
    pub fn bearer(token: String, user: UserDto) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            user,
        }
    }
}

pub fn country_dto(country: &CountryRecord) -> CountryDto {
    CountryDto {
        id: country.id,
        name: country.name.clone(),
        code: country.code.clone(),
        currency: country.currency.clone(),
        language: country.language.clone(),
        timezone: country.timezone.clone(),
    }
}

fn state_dto(state: &StateRecord, country: &CountryRecord) -> StateDto {
    StateDto {
        id: state.id,
        name: state.name.clone(),
        code: state.code.clone(),
        country: country_dto(country),
    }
}

pub fn city_dto(path: &CityPath) -> CityDto {
    CityDto {
        id: path.city.id,
        name: path.city.name.clone(),
        latitude: path.city.latitude,
        longitude: path.city.longitude,
        population: path.city.population,
        elevation: path.city.elevation,
        state: state_dto(&path.state, &path.country),
    }
}

fn attraction_dto(attraction: &AttractionRecord) -> AttractionDto {
    AttractionDto {
        id: attraction.id,
        name: attraction.name.clone(),
        attraction_type: attraction.attraction_type,
        description: attraction.description.clone(),
        image_url: attraction.image_url.clone(),
        opening_hours: attraction.opening_hours.clone(),
        entry_fee: attraction.entry_fee.clone(),
        visit_duration: attraction.visit_duration.clone(),
        latitude: attraction.latitude,
        longitude: attraction.longitude,
        contact_info: attraction.contact_info.clone(),
        accessibility_info: attraction.accessibility_info.clone(),
        best_time_to_visit: attraction.best_time_to_visit.clone(),
        tips: attraction.tips.clone(),
        sort_order: attraction.sort_order,
        is_active: attraction.is_active,
    }
}

fn image_dto(image: &DestinationImageRecord) -> DestinationImageDto {
    DestinationImageDto {
        id: image.id,
        image_url: image.image_url.clone(),
        caption: image.caption.clone(),
        alt_text: image.alt_text.clone(),
        is_primary: image.is_primary,
        sort_order: image.sort_order,
    }
}

fn budget_dto(budget: &DestinationBudgetRecord) -> DestinationBudgetDto {
    DestinationBudgetDto {
        id: budget.id,
        category: budget.category.clone(),
        budget_type: budget.budget_type.clone(),
        price_per_day: budget.price_per_day,
        currency: budget.currency.clone(),
        description: budget.description.clone(),
        last_updated: budget.last_updated,
    }
}

fn weather_dto(weather: &DestinationWeatherRecord) -> DestinationWeatherDto {
    DestinationWeatherDto {
        id: weather.id,
        month: weather.month,
        min_temperature: weather.min_temperature,
        max_temperature: weather.max_temperature,
        rainfall: weather.rainfall,
        humidity: weather.humidity,
        weather_description: weather.weather_description.clone(),
        clothing_recommendations: weather.clothing_recommendations.clone(),
        activities_recommended: weather.activities_recommended.clone(),
        travel_tips: weather.travel_tips.clone(),
    }
}

/// Images ordered primary-first, then by `sort_order`. The sort is stable so
/// ties keep their storage order.
pub fn ordered_images(images: &[DestinationImageRecord]) -> Vec<DestinationImageDto> {
    let mut ordered: Vec<&DestinationImageRecord> = images.iter().collect();
    ordered.sort_by_key(|image| (!image.is_primary, image.sort_order));
    ordered.into_iter().map(image_dto).collect()
}

pub fn destination_dto(aggregate: &DestinationAggregate) -> DestinationDto {
    let d = &aggregate.destination;
    DestinationDto {
        id: d.id,
        name: d.name.clone(),
        slug: d.slug.clone(),
        city: city_dto(&aggregate.location),
        category: d.category.clone(),
        description: d.description.clone(),
        short_description: d.short_description.clone(),
        main_image_url: d.main_image_url.clone(),
        rating: d.rating,
        review_count: d.review_count,
        best_time_to_visit: d.best_time_to_visit.clone(),
        recommended_duration: d.recommended_duration.clone(),
        difficulty_level: d.difficulty_level.clone(),
        history: d.history.clone(),
        culture: d.culture.clone(),
        interesting_facts: d.interesting_facts.clone(),
        latitude: d.latitude,
        longitude: d.longitude,
        is_featured: d.is_featured,
        created_at: d.created_at,
        updated_at: d.updated_at,
        attractions: aggregate.attractions.iter().map(attraction_dto).collect(),
        images: ordered_images(&aggregate.images),
        budgets: aggregate.budgets.iter().map(budget_dto).collect(),
        weather: aggregate.weather.iter().map(weather_dto).collect(),
    }
}

pub fn blog_category_dto(category: &BlogCategoryRecord) -> BlogCategoryDto {
    BlogCategoryDto {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        description: category.description.clone(),
        sort_order: category.sort_order,
    }
}

pub fn blog_post_dto(aggregate: &BlogPostAggregate) -> BlogPostDto {
    let p = &aggregate.post;
    BlogPostDto {
        id: p.id,
        title: p.title.clone(),
        slug: p.slug.clone(),
        excerpt: p.excerpt.clone(),
        content: p.content.clone(),
        author_name: p.author_name.clone(),
        author_id: p.author_id,
        category: aggregate.category.as_ref().map(blog_category_dto),
        featured_image_url: p.featured_image_url.clone(),
        read_time: p.read_time,
        tags: p.tags.clone(),
        meta_description: p.meta_description.clone(),
        is_published: p.is_published,
        is_featured: p.is_featured,
        published_at: p.published_at,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

pub fn user_dto(user: &UserRecord) -> UserDto {
    UserDto {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        phone: user.phone.clone(),
        date_of_birth: user.date_of_birth,
        profile_image_url: user.profile_image_url.clone(),
        created_at: user.created_at,
        last_login: user.last_login,
        is_active: user.is_active,
        email_verified: user.email_verified,
    }
}
