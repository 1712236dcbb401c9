//! Public blog endpoints. Only published posts and active categories are visible.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::application::pagination::PageParams;

use super::destinations::SearchQuery;
use super::error::ApiError;
use super::state::HttpState;

pub(super) async fn list_posts(
    State(state): State<HttpState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.list_published(&params).await?))
}

pub(super) async fn featured_posts(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.featured().await?))
}

pub(super) async fn search_posts(
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
    Ok(Json(state.blog.search(&query, &params).await?))
}

pub(super) async fn posts_by_category(
    State(state): State<HttpState>,
    Path(category_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.by_category(category_id, &params).await?))
}

pub(super) async fn get_post(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .blog
        .get_post(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}

pub(super) async fn categories(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.categories().await?))
}

pub(super) async fn get_category(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .blog
        .get_category(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog category not found"))
}
