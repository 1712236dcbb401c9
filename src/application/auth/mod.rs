//! Registration, login and bearer-token verification.

mod jwt;
mod password;
mod service;

use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

pub use jwt::{Claims, JwtCodec, ROLE_ADMIN};
pub use password::{MIN_PASSWORD_LEN, hash_password, verify_password};
pub use service::{AuthService, LoginCommand, RegisterCommand};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already exists")]
    EmailExists,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("user `{0}` not found")]
    UserNotFound(String),
    #[error("account is disabled")]
    Inactive,
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AuthError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate { .. } => AuthError::EmailExists,
            other => AuthError::Repo(other),
        }
    }
}
