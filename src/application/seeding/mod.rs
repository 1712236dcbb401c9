//! Reference-data seeding: countries from an upstream catalogue and a fixed
//! set of sample destinations.

mod countries;
mod population;

use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

pub use countries::{CountrySeedingService, CountrySource, SeedReport};
pub use population::{PopulationReport, PopulationService, SAMPLE_DESTINATIONS, SampleDestination};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("country source request failed: {0}")]
    Upstream(String),
    #[error("country source returned an unreadable payload: {0}")]
    Decode(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}
