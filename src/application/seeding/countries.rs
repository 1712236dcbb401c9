use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, info};

use crate::application::repos::{GeographyRepo, NewCountry};

use super::SeedError;

const METRIC_SEED_COUNTRIES: &str = "travelpro_seed_countries_total";

/// Upstream catalogue of countries.
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<NewCountry>, SeedError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub fetched: usize,
    pub inserted: usize,
}

#[derive(Clone)]
pub struct CountrySeedingService {
    source: Arc<dyn CountrySource>,
    geography: Arc<dyn GeographyRepo>,
}

impl CountrySeedingService {
    pub fn new(source: Arc<dyn CountrySource>, geography: Arc<dyn GeographyRepo>) -> Self {
        Self { source, geography }
    }

    /// Insert every fetched country whose code is not stored yet. Existing
    /// rows are left untouched.
    pub async fn seed_countries(&self) -> Result<SeedReport, SeedError> {
        info!(target = "travelpro::seeding", "starting countries seeding");
        let countries = self.source.fetch_countries().await?;
        let mut report = SeedReport {
            fetched: countries.len(),
            inserted: 0,
        };

        for country in countries {
            if !is_storable(&country) {
                debug!(
                    target = "travelpro::seeding",
                    name = %country.name,
                    code = %country.code,
                    "skipping country without a usable name or code"
                );
                continue;
            }
            let name = country.name.clone();
            if self.geography.insert_country_if_absent(country).await? {
                report.inserted += 1;
                debug!(target = "travelpro::seeding", name = %name, "country stored");
            }
        }

        counter!(METRIC_SEED_COUNTRIES).increment(report.inserted as u64);
        info!(
            target = "travelpro::seeding",
            fetched = report.fetched,
            inserted = report.inserted,
            "countries seeding finished"
        );
        Ok(report)
    }
}

fn is_storable(country: &NewCountry) -> bool {
    !country.name.trim().is_empty() && country.code.chars().count() == 3
}
