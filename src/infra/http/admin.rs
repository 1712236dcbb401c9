//! Role-gated destination management and data population triggers.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::application::admin::{CreateDestinationCommand, UpdateDestinationCommand};
use crate::application::error::HttpError;
use crate::application::seeding::SeedError;

use super::auth::AuthPrincipal;
use super::error::ApiError;
use super::state::HttpState;

const SOURCE: &str = "infra::http::admin";

pub(super) async fn create_destination(
    State(state): State<HttpState>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(command): Json<CreateDestinationCommand>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.admin.create(command).await?;
    info!(
        target = "travelpro::http::admin",
        destination_id = %created.id,
        slug = %created.slug,
        actor = %principal.email,
        "destination created"
    );
    Ok(Json(created))
}

pub(super) async fn update_destination(
    State(state): State<HttpState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
    Json(command): Json<UpdateDestinationCommand>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.admin.update(id, command).await?;
    info!(
        target = "travelpro::http::admin",
        destination_id = %id,
        actor = %principal.email,
        "destination updated"
    );
    Ok(Json(updated))
}

pub(super) async fn delete_destination(
    State(state): State<HttpState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.admin.delete(id).await?;
    info!(
        target = "travelpro::http::admin",
        destination_id = %id,
        actor = %principal.email,
        "destination deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn toggle_featured(
    State(state): State<HttpState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.admin.toggle_featured(id).await?))
}

pub(super) async fn toggle_active(
    State(state): State<HttpState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.admin.toggle_active(id).await?))
}

pub(super) async fn populate_countries(State(state): State<HttpState>) -> Response {
    match state.population.populate_countries().await {
        Ok(report) => {
            info!(
                target = "travelpro::http::admin",
                fetched = report.fetched,
                inserted = report.inserted,
                "countries populated"
            );
            (StatusCode::OK, "Countries populated successfully").into_response()
        }
        Err(err) => population_failure("Error: ", &err),
    }
}

pub(super) async fn populate_destinations(State(state): State<HttpState>) -> Response {
    match state.population.populate_destinations().await {
        Ok(report) => {
            info!(
                target = "travelpro::http::admin",
                created = report.created,
                skipped = report.skipped,
                "destinations populated"
            );
            (StatusCode::OK, "Indian destinations populated successfully").into_response()
        }
        Err(err) => population_failure("Error: ", &err),
    }
}

pub(super) async fn populate_all(State(state): State<HttpState>) -> Response {
    match state.population.populate_all().await {
        Ok((countries, destinations)) => {
            info!(
                target = "travelpro::http::admin",
                countries_inserted = countries.inserted,
                destinations_created = destinations.created,
                "all data populated"
            );
            (StatusCode::OK, "All data populated successfully").into_response()
        }
        Err(err) => population_failure("Error: ", &err),
    }
}

pub(super) async fn seed_countries(State(state): State<HttpState>) -> Response {
    match state.population.populate_countries().await {
        Ok(_) => (
            StatusCode::OK,
            "Countries data seeding completed successfully",
        )
            .into_response(),
        Err(err) => population_failure("Error during countries seeding: ", &err),
    }
}

fn population_failure(prefix: &str, err: &SeedError) -> Response {
    error!(
        target = "travelpro::http::admin",
        error = %err,
        "data population failed"
    );
    HttpError::from_error(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{prefix}{err}"),
        err,
    )
    .into_response()
}
