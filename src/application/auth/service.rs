use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::application::projection::{AuthResponse, UserDto, user_dto};
use crate::application::repos::{NewUser, UsersRepo};
use crate::domain::error::{DomainError, ensure_non_blank};
use crate::domain::types::UserRole;

use super::AuthError;
use super::jwt::{Claims, JwtCodec};
use super::password::{MIN_PASSWORD_LEN, hash_password, verify_password};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    jwt: JwtCodec,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepo>, jwt: JwtCodec) -> Self {
        Self { users, jwt }
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.jwt.verify(token)
    }

    pub async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&command.email)?;
        if command.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailExists);
        }

        let password_hash = hash_password(&command.password)?;
        let user = self
            .users
            .create_user(NewUser {
                email,
                password_hash,
                first_name: command.first_name,
                last_name: command.last_name,
                phone: command.phone,
                date_of_birth: command.date_of_birth,
                role: UserRole::User,
                preferences: json!({}),
            })
            .await?;

        info!(target = "travelpro::auth", user_id = %user.id, "user registered");
        let token = self.jwt.issue(&user)?;
        Ok(AuthResponse::bearer(token, user_dto(&user)))
    }

    pub async fn login(&self, command: LoginCommand) -> Result<AuthResponse, AuthError> {
        let email = command.email.trim();
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&command.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        let user = self
            .users
            .record_login(user.id, OffsetDateTime::now_utc())
            .await?;
        let token = self.jwt.issue(&user)?;
        Ok(AuthResponse::bearer(token, user_dto(&user)))
    }

    /// Profile of the token's subject.
    pub async fn profile(&self, email: &str) -> Result<UserDto, AuthError> {
        self.users
            .find_by_email(email)
            .await?
            .as_ref()
            .map(user_dto)
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))
    }
}

fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim();
    ensure_non_blank(email, "email")?;
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(DomainError::validation(format!("`{email}` is not a valid email")).into());
    }
    Ok(email.to_string())
}
