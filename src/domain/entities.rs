//! Domain entities mirrored from persistent storage.

use serde_json::Value as JsonValue;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{AttractionType, UserRole};

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub id: Uuid,
    pub country_id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub population: Option<i32>,
    pub elevation: Option<i32>,
    pub created_at: OffsetDateTime,
}

/// A city together with its owning state and country.
#[derive(Debug, Clone, PartialEq)]
pub struct CityPath {
    pub city: CityRecord,
    pub state: StateRecord,
    pub country: CountryRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationRecord {
    pub id: Uuid,
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttractionRecord {
    pub id: Uuid,
    pub destination_id: Uuid,
    pub name: String,
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
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationImageRecord {
    pub id: Uuid,
    pub destination_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationBudgetRecord {
    pub id: Uuid,
    pub destination_id: Uuid,
    pub category: String,
    pub budget_type: String,
    pub price_per_day: f64,
    pub currency: String,
    pub description: Option<String>,
    pub last_updated: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationWeatherRecord {
    pub id: Uuid,
    pub destination_id: Uuid,
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

/// A destination with its geography chain and owned children, as loaded by
/// the query layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationAggregate {
    pub destination: DestinationRecord,
    pub location: CityPath,
    pub attractions: Vec<AttractionRecord>,
    pub images: Vec<DestinationImageRecord>,
    pub budgets: Vec<DestinationBudgetRecord>,
    pub weather: Vec<DestinationWeatherRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogCategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author_name: Option<String>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub featured_image_url: Option<String>,
    pub read_time: Option<i32>,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A blog post joined with its category, when it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostAggregate {
    pub post: BlogPostRecord,
    pub category: Option<BlogCategoryRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
    pub profile_image_url: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}
