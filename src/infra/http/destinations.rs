//! Public destination read endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::pagination::PageParams;

use super::error::ApiError;
use super::state::HttpState;

const NOT_FOUND: &str = "Destination not found";

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FilterQuery {
    pub category: Option<String>,
    pub country: Option<String>,
}

pub(super) async fn list(
    State(state): State<HttpState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.destinations.list_active(&params).await?))
}

pub(super) async fn featured(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.destinations.featured().await?))
}

pub(super) async fn top(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.destinations.top().await?))
}

pub(super) async fn categories(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.destinations.categories().await?))
}

pub(super) async fn search(
    State(state): State<HttpState>,
    Query(search): Query<SearchQuery>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = search.q.ok_or_else(|| {
        ApiError::bad_request(
            "missing search query",
            Some("supply the `q` query parameter".to_string()),
        )
    })?;
    Ok(Json(state.destinations.search(&query, &params).await?))
}

pub(super) async fn filter(
    State(state): State<HttpState>,
    Query(filter): Query<FilterQuery>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .destinations
        .filter(
            filter.category.as_deref(),
            filter.country.as_deref(),
            &params,
        )
        .await?;
    Ok(Json(page))
}

pub(super) async fn by_category(
    State(state): State<HttpState>,
    Path(category): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.destinations.by_category(&category, &params).await?))
}

pub(super) async fn by_slug(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .destinations
        .get_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub(super) async fn by_id(
    State(state): State<HttpState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .destinations
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}
