//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profession: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
}

/// Validated registration fields.
#[derive(Debug, PartialEq)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub profession: Option<&'a str>,
}

/// How a login request identifies the account.
#[derive(Debug, PartialEq)]
pub enum LoginIdentity<'a> {
    Email(&'a str),
    Username(&'a str),
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<NewUser<'_>, AppError> {
        match (
            non_blank(&self.username),
            non_blank(&self.email),
            self.password.as_deref().filter(|p| !p.is_empty()),
            non_blank(&self.first_name),
            non_blank(&self.last_name),
        ) {
            (Some(username), Some(email), Some(password), Some(first_name), Some(last_name)) => {
                Ok(NewUser {
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                    profession: non_blank(&self.profession),
                })
            }
            _ => Err(AppError::Validation("Missing required fields".to_string())),
        }
    }
}

impl LoginRequest {
    /// Returns the identity to look up and the password to check.
    /// Email takes precedence over username when both are supplied.
    pub fn validate(&self) -> Result<(LoginIdentity<'_>, &str), AppError> {
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("Password is required".to_string()))?;

        let identity = if let Some(email) = self.email.as_deref().map(str::trim) {
            LoginIdentity::Email(email)
        } else if let Some(username) = self.username.as_deref().map(str::trim) {
            LoginIdentity::Username(username)
        } else {
            return Err(AppError::Validation(
                "Email or username required".to_string(),
            ));
        };

        Ok((identity, password))
    }
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let new_user = req.validate()?;

    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(new_user.username)
            .fetch_one(&state.db)
            .await?;
    if username_taken {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    let email_taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(new_user.email)
        .fetch_one(&state.db)
        .await?;
    if email_taken {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let password = new_user.password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, first_name, last_name, profession, headline)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(new_user.username)
    .bind(new_user.email)
    .bind(&password_hash)
    .bind(new_user.first_name)
    .bind(new_user.last_name)
    .bind(new_user.profession)
    .bind(format!("{} {}", new_user.first_name, new_user.last_name))
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Validation("Username or email already registered".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Registered user {} ({})", user.id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (identity, password) = req.validate()?;

    let user = match identity {
        LoginIdentity::Email(email) => {
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&state.db)
                .await?
        }
        LoginIdentity::Username(username) => {
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&state.db)
                .await?
        }
    };

    let invalid = || AppError::Unauthorized("Invalid email/username or password".to_string());
    let user = user.ok_or_else(invalid)?;

    let password = password.to_string();
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !verified {
        return Err(invalid());
    }

    info!("User {} logged in", user.id);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code())
        .is_some_and(|code| code == "23505")
}
