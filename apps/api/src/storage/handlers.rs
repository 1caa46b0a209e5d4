use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /uploads/*key
///
/// Streams a stored upload (profile picture, resume) back to the client.
pub async fn handle_get_upload(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if key.split('/').any(|segment| segment == "..") {
        return Err(AppError::Validation("Invalid upload path".to_string()));
    }

    let object = state
        .storage
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Upload {key} not found")))?;

    Ok(([(header::CONTENT_TYPE, object.content_type)], object.bytes))
}
