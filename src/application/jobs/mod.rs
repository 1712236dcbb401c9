mod seed_countries;

pub use seed_countries::{
    DEFAULT_SEED_COUNTRIES_CRON, SeedCountriesContext, SeedCountriesJob, parse_schedule,
    process_seed_countries_job,
};
