use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{GeographyRepo, NewCountry, RepoError},
    domain::entities::{CityPath, CityRecord, CountryRecord, StateRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

const CITY_PATH_SELECT: &str = r#"
    SELECT
        c.id AS city_id,
        c.state_id AS city_state_id,
        c.name AS city_name,
        c.latitude::float8 AS city_latitude,
        c.longitude::float8 AS city_longitude,
        c.population AS city_population,
        c.elevation AS city_elevation,
        c.created_at AS city_created_at,
        s.id AS state_id,
        s.country_id AS state_country_id,
        s.name AS state_name,
        s.code AS state_code,
        s.created_at AS state_created_at,
        co.id AS country_id,
        co.name AS country_name,
        co.code AS country_code,
        co.currency AS country_currency,
        co.language AS country_language,
        co.timezone AS country_timezone,
        co.created_at AS country_created_at
    FROM cities c
    INNER JOIN states s ON s.id = c.state_id
    INNER JOIN countries co ON co.id = s.country_id
"#;

#[derive(sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    name: String,
    code: String,
    currency: Option<String>,
    language: Option<String>,
    timezone: Option<String>,
    created_at: OffsetDateTime,
}

impl From<CountryRow> for CountryRecord {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            code: row.code,
            currency: row.currency,
            language: row.language,
            timezone: row.timezone,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StateRow {
    id: Uuid,
    country_id: Uuid,
    name: String,
    code: Option<String>,
    created_at: OffsetDateTime,
}

impl From<StateRow> for StateRecord {
    fn from(row: StateRow) -> Self {
        Self {
            id: row.id,
            country_id: row.country_id,
            name: row.name,
            code: row.code,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CityRow {
    id: Uuid,
    state_id: Uuid,
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    population: Option<i32>,
    elevation: Option<i32>,
    created_at: OffsetDateTime,
}

impl From<CityRow> for CityRecord {
    fn from(row: CityRow) -> Self {
        Self {
            id: row.id,
            state_id: row.state_id,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            population: row.population,
            elevation: row.elevation,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CityPathRow {
    city_id: Uuid,
    city_state_id: Uuid,
    city_name: String,
    city_latitude: Option<f64>,
    city_longitude: Option<f64>,
    city_population: Option<i32>,
    city_elevation: Option<i32>,
    city_created_at: OffsetDateTime,
    state_id: Uuid,
    state_country_id: Uuid,
    state_name: String,
    state_code: Option<String>,
    state_created_at: OffsetDateTime,
    country_id: Uuid,
    country_name: String,
    country_code: String,
    country_currency: Option<String>,
    country_language: Option<String>,
    country_timezone: Option<String>,
    country_created_at: OffsetDateTime,
}

impl From<CityPathRow> for CityPath {
    fn from(row: CityPathRow) -> Self {
        Self {
            city: CityRecord {
                id: row.city_id,
                state_id: row.city_state_id,
                name: row.city_name,
                latitude: row.city_latitude,
                longitude: row.city_longitude,
                population: row.city_population,
                elevation: row.city_elevation,
                created_at: row.city_created_at,
            },
            state: StateRecord {
                id: row.state_id,
                country_id: row.state_country_id,
                name: row.state_name,
                code: row.state_code,
                created_at: row.state_created_at,
            },
            country: CountryRecord {
                id: row.country_id,
                name: row.country_name,
                code: row.country_code,
                currency: row.country_currency,
                language: row.country_language,
                timezone: row.country_timezone,
                created_at: row.country_created_at,
            },
        }
    }
}

impl PostgresRepositories {
    /// Geography chains keyed by city id.
    pub(super) async fn load_city_paths(
        &self,
        city_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CityPath>, RepoError> {
        if city_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!("{CITY_PATH_SELECT} WHERE c.id = ANY($1)");
        let rows = sqlx::query_as::<_, CityPathRow>(&sql)
            .bind(city_ids)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.city_id, CityPath::from(row)))
            .collect())
    }
}

#[async_trait]
impl GeographyRepo for PostgresRepositories {
    async fn find_city(&self, id: Uuid) -> Result<Option<CityPath>, RepoError> {
        let sql = format!("{CITY_PATH_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CityPathRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CityPath::from))
    }

    async fn insert_country_if_absent(&self, country: NewCountry) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO countries (id, name, code, currency, language, timezone)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&country.name)
        .bind(&country.code)
        .bind(&country.currency)
        .bind(&country.language)
        .bind(&country.timezone)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_or_create_country(&self, country: NewCountry) -> Result<CountryRecord, RepoError> {
        self.insert_country_if_absent(country.clone()).await?;

        let row = sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, name, code, currency, language, timezone, created_at
            FROM countries
            WHERE code = $1 OR name = $2
            ORDER BY (code = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(&country.code)
        .bind(&country.name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn get_or_create_state(
        &self,
        country_id: Uuid,
        name: &str,
    ) -> Result<StateRecord, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO states (id, country_id, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (country_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(country_id)
        .bind(name)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, StateRow>(
            r#"
            SELECT id, country_id, name, code, created_at
            FROM states
            WHERE country_id = $1 AND name = $2
            "#,
        )
        .bind(country_id)
        .bind(name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn get_or_create_city(
        &self,
        state_id: Uuid,
        name: &str,
    ) -> Result<CityRecord, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO cities (id, state_id, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (state_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(state_id)
        .bind(name)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, CityRow>(
            r#"
            SELECT
                id, state_id, name,
                latitude::float8 AS latitude,
                longitude::float8 AS longitude,
                population, elevation, created_at
            FROM cities
            WHERE state_id = $1 AND name = $2
            "#,
        )
        .bind(state_id)
        .bind(name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }
}
