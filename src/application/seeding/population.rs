use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::info;

use crate::application::admin::destinations::clear_destination_lists;
use crate::application::repos::{
    CreateDestinationParams, DestinationsWriteRepo, GeographyRepo, NewCountry,
};
use crate::cache::CacheAside;
use crate::domain::slug::validate_slug;

use super::{CountrySeedingService, SeedError, SeedReport};

const SHORT_DESCRIPTION_CHARS: usize = 100;
const FEATURED_ABOVE_RATING: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDestination {
    pub name: &'static str,
    pub slug: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub rating: f64,
}

pub const SAMPLE_DESTINATIONS: [SampleDestination; 8] = [
    SampleDestination {
        name: "Taj Mahal",
        slug: "taj-mahal",
        city: "Agra",
        state: "Uttar Pradesh",
        category: "Historical",
        description: "An ivory-white marble mausoleum and UNESCO World Heritage Site",
        image_url: "https://images.unsplash.com/photo-1564507592333-c60657eea523",
        rating: 4.8,
    },
    SampleDestination {
        name: "Kerala Backwaters",
        slug: "kerala-backwaters",
        city: "Alleppey",
        state: "Kerala",
        category: "Nature",
        description: "Network of brackish lagoons and lakes famous for houseboat cruises",
        image_url: "https://images.unsplash.com/photo-1602216056096-3b40cc0c9944",
        rating: 4.6,
    },
    SampleDestination {
        name: "Goa Beaches",
        slug: "goa-beaches",
        city: "Panaji",
        state: "Goa",
        category: "Beach",
        description: "Golden sandy beaches with Portuguese colonial architecture",
        image_url: "https://images.unsplash.com/photo-1512343879784-a960bf40e7f2",
        rating: 4.4,
    },
    SampleDestination {
        name: "Rajasthan Palaces",
        slug: "rajasthan-palaces",
        city: "Jaipur",
        state: "Rajasthan",
        category: "Historical",
        description: "Royal palaces showcasing grandeur of Rajput architecture",
        image_url: "https://images.unsplash.com/photo-1599661046827-dacde6976549",
        rating: 4.7,
    },
    SampleDestination {
        name: "Himachal Mountains",
        slug: "himachal-mountains",
        city: "Shimla",
        state: "Himachal Pradesh",
        category: "Mountain",
        description: "Scenic hill stations with snow-capped peaks and adventure sports",
        image_url: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4",
        rating: 4.5,
    },
    SampleDestination {
        name: "Golden Temple",
        slug: "golden-temple",
        city: "Amritsar",
        state: "Punjab",
        category: "Spiritual",
        description: "Holiest Gurdwara of Sikhism with stunning golden architecture",
        image_url: "https://images.unsplash.com/photo-1578662996442-48f60103fc96",
        rating: 4.9,
    },
    SampleDestination {
        name: "Ladakh",
        slug: "ladakh",
        city: "Leh",
        state: "Ladakh",
        category: "Adventure",
        description: "High-altitude desert with Buddhist monasteries and stunning landscapes",
        image_url: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4",
        rating: 4.8,
    },
    SampleDestination {
        name: "Hampi",
        slug: "hampi",
        city: "Hampi",
        state: "Karnataka",
        category: "Historical",
        description: "UNESCO World Heritage Site with ancient Vijayanagara Empire ruins",
        image_url: "https://images.unsplash.com/photo-1582510003544-4d00b7f74220",
        rating: 4.6,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub created: usize,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct PopulationService {
    geography: Arc<dyn GeographyRepo>,
    writer: Arc<dyn DestinationsWriteRepo>,
    cache: CacheAside,
    countries: CountrySeedingService,
}

impl PopulationService {
    pub fn new(
        geography: Arc<dyn GeographyRepo>,
        writer: Arc<dyn DestinationsWriteRepo>,
        cache: CacheAside,
        countries: CountrySeedingService,
    ) -> Self {
        Self {
            geography,
            writer,
            cache,
            countries,
        }
    }

    pub async fn populate_countries(&self) -> Result<SeedReport, SeedError> {
        self.countries.seed_countries().await
    }

    /// Insert the sample destinations that are not stored yet. Safe to run
    /// repeatedly.
    pub async fn populate_destinations(&self) -> Result<PopulationReport, SeedError> {
        info!(target = "travelpro::seeding", "starting sample destination population");
        let india = self.geography.get_or_create_country(india()).await?;
        let mut report = PopulationReport::default();

        for sample in &SAMPLE_DESTINATIONS {
            validate_slug(sample.slug)?;
            let state = self
                .geography
                .get_or_create_state(india.id, sample.state)
                .await?;
            let city = self
                .geography
                .get_or_create_city(state.id, sample.city)
                .await?;

            if self.writer.slug_exists(sample.slug).await? {
                report.skipped += 1;
                continue;
            }
            self.writer
                .create_destination(sample_params(sample, city.id))
                .await?;
            report.created += 1;
            info!(target = "travelpro::seeding", name = sample.name, "destination created");
        }

        clear_destination_lists(&self.cache);
        info!(
            target = "travelpro::seeding",
            created = report.created,
            skipped = report.skipped,
            "sample destination population finished"
        );
        Ok(report)
    }

    pub async fn populate_all(&self) -> Result<(SeedReport, PopulationReport), SeedError> {
        let countries = self.populate_countries().await?;
        let destinations = self.populate_destinations().await?;
        Ok((countries, destinations))
    }
}

fn india() -> NewCountry {
    NewCountry {
        name: "India".to_string(),
        code: "IND".to_string(),
        currency: Some("INR".to_string()),
        language: Some("Hindi".to_string()),
        timezone: Some("Asia/Kolkata".to_string()),
    }
}

fn sample_params(sample: &SampleDestination, city_id: uuid::Uuid) -> CreateDestinationParams {
    CreateDestinationParams {
        name: sample.name.to_string(),
        slug: sample.slug.to_string(),
        city_id,
        category: sample.category.to_string(),
        description: sample.description.to_string(),
        short_description: Some(short_description(sample.description)),
        main_image_url: Some(sample.image_url.to_string()),
        rating: sample.rating,
        review_count: review_count_for(sample.slug),
        best_time_to_visit: Some(best_time_for(sample.category).to_string()),
        recommended_duration: Some(duration_for(sample.category).to_string()),
        difficulty_level: Some("Easy".to_string()),
        accessibility_info: None,
        history: None,
        culture: None,
        interesting_facts: Vec::new(),
        latitude: None,
        longitude: None,
        is_featured: sample.rating > FEATURED_ABOVE_RATING,
        is_active: true,
    }
}

pub(crate) fn short_description(description: &str) -> String {
    description.chars().take(SHORT_DESCRIPTION_CHARS).collect()
}

/// Stable pseudo-random count in `100..1100`.
pub(crate) fn review_count_for(slug: &str) -> i32 {
    let mut hasher = DefaultHasher::new();
    slug.hash(&mut hasher);
    100 + (hasher.finish() % 1000) as i32
}

pub(crate) fn best_time_for(category: &str) -> &'static str {
    match category {
        "Mountain" => "March to June, September to November",
        "Beach" | "Nature" => "November to February",
        "Historical" | "Spiritual" => "October to March",
        "Adventure" => "April to June, September to November",
        _ => "October to March",
    }
}

pub(crate) fn duration_for(category: &str) -> &'static str {
    match category {
        "Historical" | "Spiritual" => "1-2 days",
        "Beach" | "Nature" => "3-5 days",
        "Mountain" | "Adventure" => "4-7 days",
        _ => "2-3 days",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_slugs_are_canonical_and_unique() {
        let mut slugs: Vec<_> = SAMPLE_DESTINATIONS.iter().map(|s| s.slug).collect();
        for slug in &slugs {
            assert!(validate_slug(slug).is_ok(), "{slug}");
        }
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), SAMPLE_DESTINATIONS.len());
    }

    #[test]
    fn featured_flag_requires_rating_above_threshold() {
        let featured: Vec<_> = SAMPLE_DESTINATIONS
            .iter()
            .filter(|s| sample_params(s, uuid::Uuid::nil()).is_featured)
            .map(|s| s.slug)
            .collect();
        assert!(featured.contains(&"taj-mahal"));
        assert!(!featured.contains(&"himachal-mountains"));
        assert!(!featured.contains(&"goa-beaches"));
        assert_eq!(featured.len(), 6);
    }

    #[test]
    fn category_tables() {
        assert_eq!(best_time_for("Mountain"), "March to June, September to November");
        assert_eq!(best_time_for("Nature"), "November to February");
        assert_eq!(best_time_for("Wildlife"), "October to March");
        assert_eq!(duration_for("Spiritual"), "1-2 days");
        assert_eq!(duration_for("Adventure"), "4-7 days");
        assert_eq!(duration_for("Wildlife"), "2-3 days");
    }

    #[test]
    fn review_counts_are_bounded_and_stable() {
        for sample in &SAMPLE_DESTINATIONS {
            let count = review_count_for(sample.slug);
            assert!((100..1100).contains(&count));
            assert_eq!(count, review_count_for(sample.slug));
        }
    }

    #[test]
    fn short_description_is_truncated_on_char_boundary() {
        let long = "é".repeat(150);
        assert_eq!(short_description(&long).chars().count(), 100);
        assert_eq!(short_description("Hampi"), "Hampi");
    }
}
