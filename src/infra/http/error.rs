use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::admin::destinations::AdminDestinationError;
use crate::application::auth::AuthError;
use crate::application::error::{ErrorReport, ReadError};
use crate::application::pagination::PaginationError;
use crate::application::repos::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const VALIDATION: &str = "validation_error";
    pub const INVALID_PAGE: &str = "invalid_page";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTEGRITY: &str = "integrity_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
    pub const CACHE: &str = "cache_error";
    pub const AUTH: &str = "auth_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
    source: &'static str,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
            source: "infra::http",
        }
    }

    /// Name the layer that produced the error in the attached report.
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }

    pub fn bad_request(message: impl Into<String>, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            codes::FORBIDDEN,
            "Access denied",
            Some("administrator role required".to_string()),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = format!(
            "{}: {}",
            self.code,
            self.hint.as_deref().unwrap_or(self.message.as_str())
        );
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(self.source, self.status, detail).attach(&mut response);
        response
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        let hint = Some(err.to_string());
        let error = match err {
            RepoError::Duplicate { .. } => {
                Self::new(StatusCode::CONFLICT, codes::DUPLICATE, "Duplicate record", hint)
            }
            RepoError::NotFound => Self::not_found("Resource not found"),
            RepoError::InvalidInput { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "Invalid input",
                hint,
            ),
            RepoError::Integrity { .. } => Self::new(
                StatusCode::CONFLICT,
                codes::INTEGRITY,
                "Integrity constraint violated",
                hint,
            ),
            RepoError::Timeout => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
                "Database timeout",
                None,
            ),
            RepoError::Persistence(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
                "Persistence error",
                hint,
            ),
        };
        error.with_source("infra::http::repo")
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_PAGE,
            "Invalid paging parameters",
            Some(err.to_string()),
        )
        .with_source("infra::http::pagination")
    }
}

impl From<ReadError> for ApiError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Pagination(err) => err.into(),
            ReadError::Repo(err) => err.into(),
            ReadError::Cache(err) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::CACHE,
                "Cache error",
                Some(err.to_string()),
            )
            .with_source("infra::http::cache"),
        }
    }
}

impl From<AdminDestinationError> for ApiError {
    fn from(err: AdminDestinationError) -> Self {
        let source = "infra::http::admin::destinations";
        match err {
            AdminDestinationError::Validation(err) => Self::new(
                StatusCode::BAD_REQUEST,
                codes::VALIDATION,
                "Invalid destination",
                Some(err.to_string()),
            )
            .with_source(source),
            AdminDestinationError::CityNotFound(id) => {
                Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, "City not found", Some(id.to_string()))
                    .with_source(source)
            }
            AdminDestinationError::NotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
                "Destination not found",
                Some(id.to_string()),
            )
            .with_source(source),
            AdminDestinationError::DuplicateSlug(slug) => Self::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "Destination slug already exists",
                Some(slug),
            )
            .with_source(source),
            AdminDestinationError::Repo(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let source = "infra::http::auth";
        match err {
            AuthError::EmailExists => Self::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "Email already exists",
                None,
            )
            .with_source(source),
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHORIZED,
                "Invalid email or password",
                None,
            )
            .with_source(source),
            AuthError::Inactive => Self::new(
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHORIZED,
                "Account is disabled",
                None,
            )
            .with_source(source),
            AuthError::UserNotFound(_) => Self::not_found("User not found").with_source(source),
            AuthError::Validation(err) => Self::new(
                StatusCode::BAD_REQUEST,
                codes::VALIDATION,
                "Invalid registration",
                Some(err.to_string()),
            )
            .with_source(source),
            AuthError::Token(_) => Self::new(
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHORIZED,
                "Invalid or expired token",
                None,
            )
            .with_source(source),
            AuthError::Hashing(message) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::AUTH,
                "Authentication failure",
                Some(message),
            )
            .with_source(source),
            AuthError::Repo(err) => err.into(),
        }
    }
}
