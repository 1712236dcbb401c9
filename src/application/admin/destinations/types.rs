use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::error::{DomainError, ensure_in_range, ensure_non_blank};

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 9.99;

#[derive(Debug, Error)]
pub enum AdminDestinationError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("city `{0}` does not exist")]
    CityNotFound(Uuid),
    #[error("destination `{0}` does not exist")]
    NotFound(Uuid),
    #[error("a destination with slug `{0}` already exists")]
    DuplicateSlug(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestinationCommand {
    pub name: String,
    pub slug: String,
    pub city_id: Uuid,
    pub category: String,
    pub description: String,
    pub short_description: Option<String>,
    pub main_image_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub best_time_to_visit: Option<String>,
    pub recommended_duration: Option<String>,
    pub difficulty_level: Option<String>,
    pub accessibility_info: Option<String>,
    pub history: Option<String>,
    pub culture: Option<String>,
    #[serde(default)]
    pub interesting_facts: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// Partial patch. Absent fields keep their stored value; slug and city
/// cannot be changed here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestinationCommand {
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

pub(crate) fn ensure_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), DomainError> {
    if let Some(lat) = latitude {
        ensure_in_range(lat, "latitude", -90.0, 90.0)?;
    }
    if let Some(lng) = longitude {
        ensure_in_range(lng, "longitude", -180.0, 180.0)?;
    }
    Ok(())
}

pub(crate) fn ensure_optional_non_blank(
    value: Option<&str>,
    field: &'static str,
) -> Result<(), DomainError> {
    match value {
        Some(value) => ensure_non_blank(value, field),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_command_accepts_sparse_json() {
        let command: UpdateDestinationCommand =
            serde_json::from_str(r#"{"shortDescription":"Marble at dawn"}"#).unwrap();
        assert_eq!(command.short_description.as_deref(), Some("Marble at dawn"));
        assert!(command.name.is_none());
        assert!(command.is_featured.is_none());
    }

    #[test]
    fn coordinates_are_bounded() {
        assert!(ensure_coordinates(Some(27.17), Some(78.04)).is_ok());
        assert!(ensure_coordinates(Some(91.0), None).is_err());
        assert!(ensure_coordinates(None, Some(-181.0)).is_err());
    }
}
