mod admin;
mod auth;
mod blog;
mod destinations;
pub mod error;
mod middleware;
mod state;

pub use auth::{
    AuthPrincipal, MSG_AUTH_REQUIRED, MSG_INVALID_HEADER, MSG_INVALID_TOKEN, require_admin,
    require_auth,
};
pub use middleware::RequestContext;
pub use state::{HealthProbe, HttpState};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::application::error::ErrorReport;

/// Assemble every public, authenticated and admin route.
pub fn build_router(state: HttpState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/destinations", get(destinations::list))
        .route("/destinations/featured", get(destinations::featured))
        .route("/destinations/top", get(destinations::top))
        .route("/destinations/categories", get(destinations::categories))
        .route("/destinations/search", get(destinations::search))
        .route("/destinations/filter", get(destinations::filter))
        .route(
            "/destinations/category/{category}",
            get(destinations::by_category),
        )
        .route("/destinations/slug/{slug}", get(destinations::by_slug))
        .route("/destinations/{id}", get(destinations::by_id))
        .route("/blog/posts", get(blog::list_posts))
        .route("/blog/posts/featured", get(blog::featured_posts))
        .route("/blog/posts/search", get(blog::search_posts))
        .route(
            "/blog/posts/category/{category_id}",
            get(blog::posts_by_category),
        )
        .route("/blog/posts/{slug}", get(blog::get_post))
        .route("/blog/categories", get(blog::categories))
        .route("/blog/categories/{slug}", get(blog::get_category))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let authenticated = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let admin = Router::new()
        .route("/admin/destinations", post(admin::create_destination))
        .route(
            "/admin/destinations/{id}",
            put(admin::update_destination).delete(admin::delete_destination),
        )
        .route(
            "/admin/destinations/{id}/featured",
            put(admin::toggle_featured),
        )
        .route("/admin/destinations/{id}/active", put(admin::toggle_active))
        .route("/admin/populate/countries", post(admin::populate_countries))
        .route(
            "/admin/populate/destinations",
            post(admin::populate_destinations),
        )
        .route("/admin/populate/all", post(admin::populate_all))
        .route(
            "/admin/data-seeding/countries",
            post(admin::seed_countries),
        )
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    public
        .merge(authenticated)
        .merge(admin)
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}

async fn health(State(state): State<HttpState>) -> Response {
    match state.health.check().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_message(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                err,
            )
            .attach(&mut response);
            response
        }
    }
}
