//! Bearer-token guards and the account endpoints.

use axum::{
    Json,
    body::Body,
    extract::{Extension, State},
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::application::auth::{Claims, LoginCommand, ROLE_ADMIN, RegisterCommand};
use crate::application::error::ErrorReport;
use crate::application::projection::{AuthResponse, UserDto};

use super::error::ApiError;
use super::state::HttpState;

pub const MSG_AUTH_REQUIRED: &str = "Authentication required";
pub const MSG_INVALID_HEADER: &str = "Invalid authorization header format. Use 'Bearer <token>'";
pub const MSG_INVALID_TOKEN: &str = "Invalid or expired token";

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPrincipal {
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthPrincipal {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ROLE_ADMIN)
    }
}

impl From<Claims> for AuthPrincipal {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            roles: claims.roles,
        }
    }
}

#[derive(Debug, Serialize)]
struct UnauthorizedBody<'a> {
    timestamp: String,
    status: u16,
    error: &'static str,
    message: &'a str,
    path: &'a str,
}

fn unauthorized(path: &str, message: &'static str) -> Response {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let body = UnauthorizedBody {
        timestamp,
        status: StatusCode::UNAUTHORIZED.as_u16(),
        error: "Unauthorized",
        message,
        path,
    };
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    ErrorReport::from_message("infra::http::auth", StatusCode::UNAUTHORIZED, message)
        .attach(&mut response);
    response
}

pub async fn require_auth(
    State(state): State<HttpState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let token = match request.headers().get(AUTHORIZATION) {
        None => return unauthorized(&path, MSG_AUTH_REQUIRED),
        Some(value) => match value.to_str().ok().and_then(|raw| raw.strip_prefix(BEARER_PREFIX)) {
            Some(token) => token.trim().to_string(),
            None => return unauthorized(&path, MSG_INVALID_HEADER),
        },
    };

    let principal = match state.auth.verify_token(&token) {
        Ok(claims) => AuthPrincipal::from(claims),
        Err(err) => {
            debug!(target = "travelpro::http::auth", error = %err, "token rejected");
            return unauthorized(&path, MSG_INVALID_TOKEN);
        }
    };

    request.extensions_mut().insert(principal.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

/// Must run inside [`require_auth`].
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthPrincipal>() {
        Some(principal) if principal.is_admin() => next.run(request).await,
        Some(_) => ApiError::forbidden()
            .with_source("infra::http::auth")
            .into_response(),
        None => unauthorized(request.uri().path(), MSG_AUTH_REQUIRED),
    }
}

pub(super) async fn register(
    State(state): State<HttpState>,
    Json(command): Json<RegisterCommand>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = state.auth.register(command).await?;
    info!(
        target = "travelpro::http::auth",
        user_id = %response.user.id,
        "user registered"
    );
    Ok(Json(response))
}

pub(super) async fn login(
    State(state): State<HttpState>,
    Json(command): Json<LoginCommand>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(state.auth.login(command).await?))
}

pub(super) async fn profile(
    State(state): State<HttpState>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<UserDto>, ApiError> {
    Ok(Json(state.auth.profile(&principal.email).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_is_recognized() {
        let principal = AuthPrincipal {
            email: "admin@example.com".to_string(),
            roles: vec!["ROLE_USER".to_string(), ROLE_ADMIN.to_string()],
        };
        assert!(principal.is_admin());

        let user = AuthPrincipal {
            email: "user@example.com".to_string(),
            roles: vec!["ROLE_USER".to_string()],
        };
        assert!(!user.is_admin());
    }

    #[test]
    fn unauthorized_response_has_status_and_report() {
        let response = unauthorized("/auth/profile", MSG_INVALID_HEADER);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.messages, vec![MSG_INVALID_HEADER.to_string()]);
    }
}
