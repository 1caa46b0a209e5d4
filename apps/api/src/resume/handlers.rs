//! Axum route handlers for resumes.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::cache::invalidate_recommendations;
use crate::models::resume::ResumeRow;
use crate::resume::analyzer::{analyze_resume, ResumeAnalysis};
use crate::resume::extract::extract_text;
use crate::resume::parser::{parse_resume, ParsedResume};
use crate::resume::ALLOWED_EXTENSIONS;
use crate::state::AppState;
use crate::storage::upload::{read_upload_form, UploadForm, UploadedFile};
use crate::storage::{file_extension, sanitize_filename};
use crate::users::handlers::find_user;

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub message: String,
    pub resume: ResumeRow,
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeRow>,
}

/// A validated upload: the file, its sanitized name and extension, and the owner.
#[derive(Debug)]
struct ResumeUpload {
    file: UploadedFile,
    filename: String,
    extension: String,
    user_id: Uuid,
}

fn validate_upload(form: UploadForm) -> Result<ResumeUpload, AppError> {
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let filename = sanitize_filename(&file.filename);
    if filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let extension = file_extension(&filename)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid file type. Only PDF and DOCX files are allowed.".to_string(),
            )
        })?;

    let raw_user_id = form
        .fields
        .get("user_id")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("User ID is required".to_string()))?;
    let user_id = Uuid::parse_str(raw_user_id)
        .map_err(|_| AppError::Validation(format!("Invalid user_id: {raw_user_id}")))?;

    Ok(ResumeUpload {
        file,
        filename,
        extension,
        user_id,
    })
}

fn resume_storage_key(user_id: Uuid, filename: &str) -> String {
    format!("resumes/{user_id}/{}-{filename}", Uuid::new_v4())
}

/// Extracts and parses the resume text off the async runtime.
/// Failures are logged and produce an empty parse.
async fn parse_upload(extension: String, bytes: bytes::Bytes) -> ParsedResume {
    let result = tokio::task::spawn_blocking(move || extract_text(&extension, &bytes)).await;
    match result {
        Ok(Ok(text)) => parse_resume(&text),
        Ok(Err(e)) => {
            warn!("Resume text extraction failed: {e:#}");
            ParsedResume::default()
        }
        Err(e) => {
            warn!("Resume parsing task failed: {e}");
            ParsedResume::default()
        }
    }
}

/// POST /api/resumes/upload
///
/// Multipart body with a `file` part (pdf or docx) and a `user_id` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeUploadResponse>), AppError> {
    let form = read_upload_form(multipart).await?;
    let upload = validate_upload(form)?;
    find_user(&state.db, upload.user_id).await?;

    let key = resume_storage_key(upload.user_id, &upload.filename);
    let content_type = upload
        .file
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    state
        .storage
        .put(&key, upload.file.bytes.clone(), &content_type)
        .await?;

    let parsed = parse_upload(upload.extension, upload.file.bytes).await;
    let parsed_data = serde_json::to_value(&parsed).ok();

    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (user_id, storage_key, original_filename, parsed_data, skills, full_name, email, phone, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(upload.user_id)
    .bind(&key)
    .bind(&upload.filename)
    .bind(parsed_data)
    .bind(&parsed.skills)
    .bind(&parsed.full_name)
    .bind(parsed.emails.first())
    .bind(parsed.phones.first())
    .bind(&parsed.summary)
    .fetch_one(&state.db)
    .await?;

    invalidate_recommendations(&state.redis, upload.user_id).await;

    info!(
        "Stored resume {} for user {} ({} skills extracted)",
        resume.id,
        upload.user_id,
        resume.skills.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(ResumeUploadResponse {
            message: "Resume uploaded successfully".to_string(),
            resume,
        }),
    ))
}

/// GET /api/resumes/:user_id
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ResumeListResponse { resumes }))
}

/// POST /api/resumes/analyze
pub async fn handle_analyze_resume(
    Json(body): Json<Value>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    if is_empty_body(&body) {
        return Err(AppError::Validation("No data provided".to_string()));
    }
    Ok(Json(analyze_resume(&body)))
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    fn form(filename: Option<&str>, user_id: Option<&str>) -> UploadForm {
        let mut form = UploadForm::default();
        form.file = filename.map(|name| UploadedFile {
            filename: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        });
        if let Some(id) = user_id {
            form.fields.insert("user_id".to_string(), id.to_string());
        }
        form
    }

    fn validation_message(result: Result<ResumeUpload, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_upload_validation_messages() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(validation_message(validate_upload(form(None, Some(&id)))), "No file provided");
        assert_eq!(validation_message(validate_upload(form(Some(""), Some(&id)))), "No file selected");
        assert!(validation_message(validate_upload(form(Some("cv.txt"), Some(&id))))
            .starts_with("Invalid file type"));
        assert_eq!(
            validation_message(validate_upload(form(Some("cv.pdf"), None))),
            "User ID is required"
        );
        assert!(validation_message(validate_upload(form(Some("cv.pdf"), Some("42"))))
            .starts_with("Invalid user_id"));
    }

    #[test]
    fn test_valid_upload_is_sanitized() {
        let id = Uuid::new_v4();
        let upload = validate_upload(form(Some("../My Resume.PDF"), Some(&id.to_string()))).unwrap();
        assert_eq!(upload.filename, "My_Resume.PDF");
        assert_eq!(upload.extension, "pdf");
        assert_eq!(upload.user_id, id);
    }

    #[test]
    fn test_storage_key_layout() {
        let id = Uuid::nil();
        let key = resume_storage_key(id, "cv.pdf");
        assert!(key.starts_with("resumes/00000000-0000-0000-0000-000000000000/"));
        assert!(key.ends_with("-cv.pdf"));
    }

    #[tokio::test]
    async fn test_unparseable_pdf_yields_empty_parse() {
        let parsed = parse_upload("pdf".to_string(), Bytes::from_static(b"garbage")).await;
        assert_eq!(parsed, ParsedResume::default());
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_body() {
        let err = handle_analyze_resume(Json(json!({}))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let Json(analysis) = handle_analyze_resume(Json(json!({"education": "BSc"})))
            .await
            .unwrap();
        assert_eq!(analysis.score, 15);
    }
}
