use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::{
        pagination::{Page, PageRequest},
        repos::{
            CreateDestinationParams, DestinationFilter, DestinationFlag, DestinationsRepo,
            DestinationsWriteRepo, RepoError, UpdateDestinationParams,
        },
    },
    domain::{
        entities::{
            AttractionRecord, DestinationAggregate, DestinationBudgetRecord,
            DestinationImageRecord, DestinationRecord, DestinationWeatherRecord,
        },
        types::AttractionType,
    },
};

use super::{
    PostgresRepositories, map_sqlx_error,
    util::{convert_count, escape_like},
};

const DESTINATION_COLUMNS: &str = r#"
    d.id, d.name, d.slug, d.city_id, d.category, d.description,
    d.short_description, d.main_image_url,
    d.rating::float8 AS rating, d.review_count,
    d.best_time_to_visit, d.recommended_duration, d.difficulty_level,
    d.accessibility_info, d.history, d.culture,
    COALESCE(d.interesting_facts, '{}') AS interesting_facts,
    d.latitude::float8 AS latitude, d.longitude::float8 AS longitude,
    d.is_featured, d.is_active, d.created_at, d.updated_at
"#;

const DESTINATION_FROM: &str = r#"
    FROM destinations d
    INNER JOIN cities c ON c.id = d.city_id
    INNER JOIN states s ON s.id = c.state_id
    INNER JOIN countries co ON co.id = s.country_id
"#;

const RETURNING_COLUMNS: &str = r#"
    RETURNING id, name, slug, city_id, category, description,
        short_description, main_image_url,
        rating::float8 AS rating, review_count,
        best_time_to_visit, recommended_duration, difficulty_level,
        accessibility_info, history, culture,
        COALESCE(interesting_facts, '{}') AS interesting_facts,
        latitude::float8 AS latitude, longitude::float8 AS longitude,
        is_featured, is_active, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct DestinationRow {
    id: Uuid,
    name: String,
    slug: String,
    city_id: Uuid,
    category: String,
    description: String,
    short_description: Option<String>,
    main_image_url: Option<String>,
    rating: f64,
    review_count: i32,
    best_time_to_visit: Option<String>,
    recommended_duration: Option<String>,
    difficulty_level: Option<String>,
    accessibility_info: Option<String>,
    history: Option<String>,
    culture: Option<String>,
    interesting_facts: Vec<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    is_featured: bool,
    is_active: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<DestinationRow> for DestinationRecord {
    fn from(row: DestinationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            city_id: row.city_id,
            category: row.category,
            description: row.description,
            short_description: row.short_description,
            main_image_url: row.main_image_url,
            rating: row.rating,
            review_count: row.review_count,
            best_time_to_visit: row.best_time_to_visit,
            recommended_duration: row.recommended_duration,
            difficulty_level: row.difficulty_level,
            accessibility_info: row.accessibility_info,
            history: row.history,
            culture: row.culture,
            interesting_facts: row.interesting_facts,
            latitude: row.latitude,
            longitude: row.longitude,
            is_featured: row.is_featured,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AttractionRow {
    id: Uuid,
    destination_id: Uuid,
    name: String,
    attraction_type: AttractionType,
    description: Option<String>,
    image_url: Option<String>,
    opening_hours: Option<String>,
    entry_fee: Option<String>,
    visit_duration: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    contact_info: Option<JsonValue>,
    accessibility_info: Option<String>,
    best_time_to_visit: Option<String>,
    tips: Option<String>,
    sort_order: i32,
    is_active: bool,
    created_at: OffsetDateTime,
}

impl From<AttractionRow> for AttractionRecord {
    fn from(row: AttractionRow) -> Self {
        Self {
            id: row.id,
            destination_id: row.destination_id,
            name: row.name,
            attraction_type: row.attraction_type,
            description: row.description,
            image_url: row.image_url,
            opening_hours: row.opening_hours,
            entry_fee: row.entry_fee,
            visit_duration: row.visit_duration,
            latitude: row.latitude,
            longitude: row.longitude,
            contact_info: row.contact_info,
            accessibility_info: row.accessibility_info,
            best_time_to_visit: row.best_time_to_visit,
            tips: row.tips,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    destination_id: Uuid,
    image_url: String,
    caption: Option<String>,
    alt_text: Option<String>,
    is_primary: bool,
    sort_order: i32,
    created_at: OffsetDateTime,
}

impl From<ImageRow> for DestinationImageRecord {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.id,
            destination_id: row.destination_id,
            image_url: row.image_url,
            caption: row.caption,
            alt_text: row.alt_text,
            is_primary: row.is_primary,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    destination_id: Uuid,
    category: String,
    budget_type: String,
    price_per_day: f64,
    currency: String,
    description: Option<String>,
    last_updated: OffsetDateTime,
}

impl From<BudgetRow> for DestinationBudgetRecord {
    fn from(row: BudgetRow) -> Self {
        Self {
            id: row.id,
            destination_id: row.destination_id,
            category: row.category,
            budget_type: row.budget_type,
            price_per_day: row.price_per_day,
            currency: row.currency,
            description: row.description,
            last_updated: row.last_updated,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WeatherRow {
    id: Uuid,
    destination_id: Uuid,
    month: i16,
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    rainfall: Option<f64>,
    humidity: Option<i32>,
    weather_description: Option<String>,
    clothing_recommendations: Vec<String>,
    activities_recommended: Vec<String>,
    travel_tips: Vec<String>,
}

impl From<WeatherRow> for DestinationWeatherRecord {
    fn from(row: WeatherRow) -> Self {
        Self {
            id: row.id,
            destination_id: row.destination_id,
            month: row.month,
            min_temperature: row.min_temperature,
            max_temperature: row.max_temperature,
            rainfall: row.rainfall,
            humidity: row.humidity,
            weather_description: row.weather_description,
            clothing_recommendations: row.clothing_recommendations,
            activities_recommended: row.activities_recommended,
            travel_tips: row.travel_tips,
        }
    }
}

/// Which rows a listing query may see.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    Active,
    Category(&'a str),
    Search(&'a str),
    Filter(&'a DestinationFilter),
}

#[derive(Debug, Clone, Copy)]
enum DestinationKey<'a> {
    Id(Uuid),
    Slug(&'a str),
}

fn push_scope<'q>(qb: &mut QueryBuilder<'q, Postgres>, scope: Scope<'q>) {
    qb.push(" WHERE d.is_active = TRUE");
    match scope {
        Scope::Active => {}
        Scope::Category(category) => {
            qb.push(" AND d.category = ");
            qb.push_bind(category);
        }
        Scope::Search(query) => {
            let pattern = format!("%{}%", escape_like(query));
            qb.push(" AND (d.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR d.description ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR d.category ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR c.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR s.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR co.name ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        Scope::Filter(filter) => {
            if let Some(category) = filter.category.as_deref() {
                qb.push(" AND d.category = ");
                qb.push_bind(category);
            }
            if let Some(country) = filter.country.as_deref() {
                qb.push(" AND co.name = ");
                qb.push_bind(country);
            }
        }
    }
}

impl PostgresRepositories {
    async fn destination_page(
        &self,
        scope: Scope<'_>,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) ");
        count_qb.push(DESTINATION_FROM);
        push_scope(&mut count_qb, scope);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let sort = page.sort();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(DESTINATION_COLUMNS);
        qb.push(DESTINATION_FROM);
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY ");
        qb.push(sort.column());
        qb.push(" ");
        qb.push(sort.direction().as_sql());
        qb.push(", d.id ASC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<DestinationRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let content = self.hydrate(rows).await?;
        Ok(Page::new(content, page, convert_count(total)?))
    }

    async fn find_destination(
        &self,
        key: DestinationKey<'_>,
        active_only: bool,
    ) -> Result<Option<DestinationAggregate>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(DESTINATION_COLUMNS);
        qb.push(DESTINATION_FROM);
        match key {
            DestinationKey::Id(id) => {
                qb.push(" WHERE d.id = ");
                qb.push_bind(id);
            }
            DestinationKey::Slug(slug) => {
                qb.push(" WHERE d.slug = ");
                qb.push_bind(slug);
            }
        }
        if active_only {
            qb.push(" AND d.is_active = TRUE");
        }

        let row: Option<DestinationRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Attach geography and owned children, preserving row order.
    async fn hydrate(
        &self,
        rows: Vec<DestinationRow>,
    ) -> Result<Vec<DestinationAggregate>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut city_ids: Vec<Uuid> = rows.iter().map(|row| row.city_id).collect();
        city_ids.sort_unstable();
        city_ids.dedup();

        let paths = self.load_city_paths(&city_ids).await?;
        let mut attractions = group_by_destination(
            self.load_children::<AttractionRow>(
                r#"
                SELECT id, destination_id, name, attraction_type, description, image_url,
                    opening_hours, entry_fee, visit_duration,
                    latitude::float8 AS latitude, longitude::float8 AS longitude,
                    contact_info, accessibility_info, best_time_to_visit, tips,
                    sort_order, is_active, created_at
                FROM attractions
                WHERE destination_id = ANY($1)
                ORDER BY sort_order ASC, name ASC
                "#,
                &ids,
            )
            .await?,
            |row| row.destination_id,
        );
        let mut images = group_by_destination(
            self.load_children::<ImageRow>(
                r#"
                SELECT id, destination_id, image_url, caption, alt_text,
                    is_primary, sort_order, created_at
                FROM destination_images
                WHERE destination_id = ANY($1)
                ORDER BY sort_order ASC, created_at ASC
                "#,
                &ids,
            )
            .await?,
            |row| row.destination_id,
        );
        let mut budgets = group_by_destination(
            self.load_children::<BudgetRow>(
                r#"
                SELECT id, destination_id, category, budget_type,
                    price_per_day::float8 AS price_per_day, currency, description, last_updated
                FROM destination_budgets
                WHERE destination_id = ANY($1)
                ORDER BY category ASC, budget_type ASC
                "#,
                &ids,
            )
            .await?,
            |row| row.destination_id,
        );
        let mut weather = group_by_destination(
            self.load_children::<WeatherRow>(
                r#"
                SELECT id, destination_id, month,
                    min_temperature::float8 AS min_temperature,
                    max_temperature::float8 AS max_temperature,
                    rainfall::float8 AS rainfall,
                    humidity, weather_description,
                    COALESCE(clothing_recommendations, '{}') AS clothing_recommendations,
                    COALESCE(activities_recommended, '{}') AS activities_recommended,
                    COALESCE(travel_tips, '{}') AS travel_tips
                FROM destination_weather
                WHERE destination_id = ANY($1)
                ORDER BY month ASC
                "#,
                &ids,
            )
            .await?,
            |row| row.destination_id,
        );

        rows.into_iter()
            .map(|row| -> Result<DestinationAggregate, RepoError> {
                let location = paths.get(&row.city_id).cloned().ok_or_else(|| {
                    RepoError::Integrity {
                        message: format!("destination {} references a missing city", row.id),
                    }
                })?;
                let id = row.id;
                Ok(DestinationAggregate {
                    destination: row.into(),
                    location,
                    attractions: take_children(&mut attractions, id),
                    images: take_children(&mut images, id),
                    budgets: take_children(&mut budgets, id),
                    weather: take_children(&mut weather, id),
                })
            })
            .collect()
    }

    async fn load_children<R>(&self, sql: &str, ids: &[Uuid]) -> Result<Vec<R>, RepoError>
    where
        R: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        sqlx::query_as::<_, R>(sql)
            .bind(ids)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn fetch_destination_record(
        &self,
        sql: &str,
        id: Uuid,
    ) -> Result<DestinationRecord, RepoError> {
        let row = sqlx::query_as::<_, DestinationRow>(sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;
        Ok(row.into())
    }
}

fn group_by_destination<R>(rows: Vec<R>, key: impl Fn(&R) -> Uuid) -> HashMap<Uuid, Vec<R>> {
    let mut grouped: HashMap<Uuid, Vec<R>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

fn take_children<R, T: From<R>>(grouped: &mut HashMap<Uuid, Vec<R>>, id: Uuid) -> Vec<T> {
    grouped
        .remove(&id)
        .unwrap_or_default()
        .into_iter()
        .map(T::from)
        .collect()
}

#[async_trait]
impl DestinationsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DestinationAggregate>, RepoError> {
        self.find_destination(DestinationKey::Id(id), true).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<DestinationAggregate>, RepoError> {
        self.find_destination(DestinationKey::Slug(slug), true)
            .await
    }

    async fn find_active_page(
        &self,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(Scope::Active, page).await
    }

    async fn find_by_category_page(
        &self,
        category: &str,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(Scope::Category(category), page).await
    }

    async fn search_page(
        &self,
        query: &str,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(Scope::Search(query), page).await
    }

    async fn find_with_filters(
        &self,
        filter: &DestinationFilter,
        page: &PageRequest,
    ) -> Result<Page<DestinationAggregate>, RepoError> {
        self.destination_page(Scope::Filter(filter), page).await
    }

    async fn find_featured(&self) -> Result<Vec<DestinationAggregate>, RepoError> {
        let sql = format!(
            "SELECT {DESTINATION_COLUMNS} {DESTINATION_FROM} \
             WHERE d.is_featured = TRUE AND d.is_active = TRUE \
             ORDER BY d.name ASC, d.id ASC"
        );
        let rows = sqlx::query_as::<_, DestinationRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        self.hydrate(rows).await
    }

    async fn top_n_by_rating(
        &self,
        n: u32,
        active_only: bool,
    ) -> Result<Vec<DestinationAggregate>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(DESTINATION_COLUMNS);
        qb.push(DESTINATION_FROM);
        if active_only {
            qb.push(" WHERE d.is_active = TRUE");
        }
        qb.push(" ORDER BY d.rating DESC, d.review_count DESC, d.name ASC LIMIT ");
        qb.push_bind(i64::from(n));

        let rows: Vec<DestinationRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        self.hydrate(rows).await
    }

    async fn all_categories(&self) -> Result<Vec<String>, RepoError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM destinations
            WHERE is_active = TRUE
            ORDER BY category ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl DestinationsWriteRepo for PostgresRepositories {
    async fn load_for_admin(&self, id: Uuid) -> Result<Option<DestinationAggregate>, RepoError> {
        self.find_destination(DestinationKey::Id(id), false).await
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM destinations WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_destination(
        &self,
        params: CreateDestinationParams,
    ) -> Result<DestinationRecord, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO destinations (
                id, name, slug, city_id, category, description, short_description,
                main_image_url, rating, review_count, best_time_to_visit,
                recommended_duration, difficulty_level, accessibility_info, history,
                culture, interesting_facts, latitude, longitude, is_featured, is_active
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            {RETURNING_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, DestinationRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&params.name)
            .bind(&params.slug)
            .bind(params.city_id)
            .bind(&params.category)
            .bind(&params.description)
            .bind(&params.short_description)
            .bind(&params.main_image_url)
            .bind(params.rating)
            .bind(params.review_count)
            .bind(&params.best_time_to_visit)
            .bind(&params.recommended_duration)
            .bind(&params.difficulty_level)
            .bind(&params.accessibility_info)
            .bind(&params.history)
            .bind(&params.culture)
            .bind(&params.interesting_facts)
            .bind(params.latitude)
            .bind(params.longitude)
            .bind(params.is_featured)
            .bind(params.is_active)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_destination(
        &self,
        params: UpdateDestinationParams,
    ) -> Result<DestinationRecord, RepoError> {
        let sql = format!(
            r#"
            UPDATE destinations SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                short_description = COALESCE($5, short_description),
                main_image_url = COALESCE($6, main_image_url),
                best_time_to_visit = COALESCE($7, best_time_to_visit),
                recommended_duration = COALESCE($8, recommended_duration),
                difficulty_level = COALESCE($9, difficulty_level),
                accessibility_info = COALESCE($10, accessibility_info),
                history = COALESCE($11, history),
                culture = COALESCE($12, culture),
                latitude = COALESCE($13, latitude::float8),
                longitude = COALESCE($14, longitude::float8),
                is_featured = COALESCE($15, is_featured),
                is_active = COALESCE($16, is_active),
                updated_at = now()
            WHERE id = $1
            {RETURNING_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, DestinationRow>(&sql)
            .bind(params.id)
            .bind(&params.name)
            .bind(&params.category)
            .bind(&params.description)
            .bind(&params.short_description)
            .bind(&params.main_image_url)
            .bind(&params.best_time_to_visit)
            .bind(&params.recommended_duration)
            .bind(&params.difficulty_level)
            .bind(&params.accessibility_info)
            .bind(&params.history)
            .bind(&params.culture)
            .bind(params.latitude)
            .bind(params.longitude)
            .bind(params.is_featured)
            .bind(params.is_active)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }

    async fn toggle_flag(
        &self,
        id: Uuid,
        flag: DestinationFlag,
    ) -> Result<DestinationRecord, RepoError> {
        let assignment = match flag {
            DestinationFlag::Featured => "is_featured = NOT is_featured",
            DestinationFlag::Active => "is_active = NOT is_active",
        };
        let sql = format!(
            "UPDATE destinations SET {assignment}, updated_at = now() WHERE id = $1 {RETURNING_COLUMNS}"
        );
        self.fetch_destination_record(&sql, id).await
    }

    async fn delete_destination(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        for table in [
            "attractions",
            "destination_images",
            "destination_budgets",
            "destination_weather",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE destination_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        let deleted = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(deleted > 0)
    }
}
