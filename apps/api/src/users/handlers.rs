//! Axum route handlers for user profiles.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::handlers::is_unique_violation;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::storage::sanitize_filename;
use crate::storage::upload::read_upload_form;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfilePictureResponse {
    pub message: String,
    pub profile_picture: String,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub profession: Option<String>,
}

pub(crate) async fn find_user(pool: &sqlx::PgPool, user_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// GET /api/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = find_user(&state.db, user_id).await?;
    Ok(Json(UserResponse { user }))
}

/// PUT /api/users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    find_user(&state.db, user_id).await?;

    if let Some(email) = req.email.as_deref() {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;
        if taken {
            return Err(AppError::Validation("Email already in use".to_string()));
        }
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            first_name = COALESCE($2, first_name),
            last_name  = COALESCE($3, last_name),
            email      = COALESCE($4, email),
            phone      = COALESCE($5, phone),
            location   = COALESCE($6, location),
            headline   = COALESCE($7, headline),
            summary    = COALESCE($8, summary),
            profession = COALESCE($9, profession)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.location)
    .bind(&req.headline)
    .bind(&req.summary)
    .bind(&req.profession)
    .fetch_one(&state.db)
    .await
    .map_err(email_conflict)?;

    info!("Updated profile for user {user_id}");

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

/// POST /api/users/:id/upload-picture
///
/// Multipart body with a `file` part. The stored object is served from `/uploads/<key>`.
pub async fn handle_upload_picture(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ProfilePictureResponse>, AppError> {
    find_user(&state.db, user_id).await?;

    let form = read_upload_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file part".to_string()))?;

    let filename = sanitize_filename(&file.filename);
    if filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let key = profile_picture_key(user_id, &filename);
    let content_type = file
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    state.storage.put(&key, file.bytes, &content_type).await?;

    let profile_picture = format!("/uploads/{key}");
    sqlx::query("UPDATE users SET profile_picture = $1 WHERE id = $2")
        .bind(&profile_picture)
        .bind(user_id)
        .execute(&state.db)
        .await?;

    Ok(Json(ProfilePictureResponse {
        message: "Profile picture uploaded successfully".to_string(),
        profile_picture,
    }))
}

/// A concurrent update can claim the email between the check and the write.
fn email_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Validation("Email already in use".to_string())
    } else {
        AppError::Database(e)
    }
}

fn profile_picture_key(user_id: Uuid, filename: &str) -> String {
    format!("profile/{user_id}/{filename}")
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct UniqueViolation;

    impl fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"users_email_key\"")
        }
    }

    impl StdError for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_email_unique_violation_is_validation_error() {
        let err = email_conflict(sqlx::Error::Database(Box::new(UniqueViolation)));
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Email already in use"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_other_database_errors_stay_internal() {
        let err = email_conflict(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_profile_picture_key_is_scoped_to_user() {
        let id = Uuid::nil();
        assert_eq!(
            profile_picture_key(id, "me.png"),
            "profile/00000000-0000-0000-0000-000000000000/me.png"
        );
    }

    #[test]
    fn test_update_request_fields_are_optional() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"headline": "Data Scientist"}"#).unwrap();
        assert_eq!(req.headline.as_deref(), Some("Data Scientist"));
        assert!(req.email.is_none());
    }
}
