//! Weekly refresh of the country catalogue.

use std::str::FromStr;
use std::sync::Arc;

use apalis::prelude::*;
use apalis_cron::Schedule;

use crate::application::seeding::CountrySeedingService;

/// Sundays at 02:00 UTC.
pub const DEFAULT_SEED_COUNTRIES_CRON: &str = "0 0 2 * * Sun";

/// Marker for the cron trigger; apalis-cron builds one per tick.
#[derive(Default, Debug, Clone)]
pub struct SeedCountriesJob;

impl From<chrono::DateTime<chrono::Utc>> for SeedCountriesJob {
    fn from(_: chrono::DateTime<chrono::Utc>) -> Self {
        Self
    }
}

#[derive(Clone)]
pub struct SeedCountriesContext {
    pub seeding: Arc<CountrySeedingService>,
}

/// Failures are logged and swallowed so the worker keeps its schedule.
pub async fn process_seed_countries_job(
    _job: SeedCountriesJob,
    ctx: Data<SeedCountriesContext>,
) -> Result<(), apalis::prelude::Error> {
    match ctx.seeding.seed_countries().await {
        Ok(report) => {
            tracing::info!(
                target = "travelpro::jobs::seed_countries",
                fetched = report.fetched,
                inserted = report.inserted,
                "Scheduled countries seeding completed"
            );
        }
        Err(err) => {
            tracing::error!(
                target = "travelpro::jobs::seed_countries",
                error = %err,
                "Scheduled countries seeding failed"
            );
        }
    }
    Ok(())
}

pub fn parse_schedule(expression: &str) -> Result<Schedule, String> {
    Schedule::from_str(expression).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike, Weekday};

    use super::*;

    #[test]
    fn default_schedule_fires_sunday_at_two() {
        let schedule = parse_schedule(DEFAULT_SEED_COUNTRIES_CRON).unwrap();
        let upcoming: Vec<_> = schedule.upcoming(chrono::Utc).take(3).collect();
        assert_eq!(upcoming.len(), 3);
        for tick in upcoming {
            assert_eq!(tick.weekday(), Weekday::Sun);
            assert_eq!(tick.hour(), 2);
            assert_eq!(tick.minute(), 0);
        }
    }

    #[test]
    fn malformed_expression_is_rejected() {
        assert!(parse_schedule("every sunday").is_err());
    }
}
