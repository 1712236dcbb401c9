//! REST Countries client backing the country seeding job.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::application::repos::NewCountry;
use crate::application::seeding::{CountrySource, SeedError};

use super::error::InfraError;

const FIELDS: &str = "name,cca3,currencies,languages,timezones";

#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    base_url: Url,
    http: reqwest::Client,
}

impl RestCountriesClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("travelpro/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base_url, http })
    }

    fn all_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/all", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut().clear().append_pair("fields", FIELDS);
        url
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    async fn fetch_countries(&self) -> Result<Vec<NewCountry>, SeedError> {
        let url = self.all_url();
        debug!(target = "travelpro::seeding", url = %url, "fetching countries");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| SeedError::Upstream(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Upstream(format!(
                "countries API responded with {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SeedError::Upstream(err.to_string()))?;
        decode_countries(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WireCountry {
    name: WireName,
    #[serde(default)]
    cca3: Option<String>,
    #[serde(default)]
    currencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    timezones: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireName {
    common: String,
}

impl From<WireCountry> for NewCountry {
    fn from(wire: WireCountry) -> Self {
        Self {
            name: wire.name.common.trim().to_string(),
            code: wire.cca3.unwrap_or_default().trim().to_string(),
            currency: wire.currencies.into_keys().next(),
            language: wire.languages.into_values().next(),
            timezone: wire.timezones.into_iter().next(),
        }
    }
}

/// Currencies and languages are keyed maps; the first key in sorted order wins.
fn decode_countries(body: &str) -> Result<Vec<NewCountry>, SeedError> {
    let wire: Vec<WireCountry> =
        serde_json::from_str(body).map_err(|err| SeedError::Decode(err.to_string()))?;
    Ok(wire.into_iter().map(NewCountry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_first_currency_language_and_timezone() {
        let body = r#"[
            {
                "name": {"common": "India", "official": "Republic of India"},
                "cca3": "IND",
                "currencies": {"INR": {"name": "Indian rupee", "symbol": "₹"}},
                "languages": {"hin": "Hindi", "tam": "Tamil"},
                "timezones": ["UTC+05:30"]
            },
            {
                "name": {"common": "Antarctica"},
                "cca3": "ATA",
                "currencies": {},
                "languages": {},
                "timezones": ["UTC-03:00", "UTC+03:00"]
            }
        ]"#;

        let countries = decode_countries(body).expect("decode");
        assert_eq!(countries.len(), 2);
        assert_eq!(
            countries[0],
            NewCountry {
                name: "India".to_string(),
                code: "IND".to_string(),
                currency: Some("INR".to_string()),
                language: Some("Hindi".to_string()),
                timezone: Some("UTC+05:30".to_string()),
            }
        );
        assert_eq!(countries[1].currency, None);
        assert_eq!(countries[1].language, None);
        assert_eq!(countries[1].timezone.as_deref(), Some("UTC-03:00"));
    }

    #[test]
    fn missing_code_decodes_as_empty() {
        let countries = decode_countries(r#"[{"name": {"common": "Nowhere"}}]"#).expect("decode");
        assert_eq!(countries[0].code, "");
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_countries("{\"message\": \"oops\"}").unwrap_err();
        assert!(matches!(err, SeedError::Decode(_)));
    }

    #[test]
    fn all_url_keeps_the_version_segment() {
        let client = RestCountriesClient::new(
            Url::parse("https://restcountries.com/v3.1").expect("url"),
            Duration::from_secs(5),
        )
        .expect("client");
        assert_eq!(
            client.all_url().as_str(),
            "https://restcountries.com/v3.1/all?fields=name%2Ccca3%2Ccurrencies%2Clanguages%2Ctimezones"
        );
    }
}
