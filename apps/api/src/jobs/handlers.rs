//! Axum route handlers for job listings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::requirements::{parse_requirements, WeightedSkill};
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct JobFilter {
    pub location: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
}

/// A listing together with its parsed requirements.
#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobRow,
    pub requirements: Vec<WeightedSkill>,
}

impl From<JobRow> for JobDetail {
    fn from(job: JobRow) -> Self {
        let requirements = parse_requirements(job.requirements.as_ref());
        Self { job, requirements }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobDetail,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub message: String,
    pub job: JobDetail,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Value>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
}

impl CreateJobRequest {
    fn required_fields(&self) -> Result<(&str, &str, &str), AppError> {
        match (
            trimmed(&self.title),
            trimmed(&self.company),
            trimmed(&self.description),
        ) {
            (Some(title), Some(company), Some(description)) => Ok((title, company, description)),
            _ => Err(AppError::Validation(
                "title, company and description are required".to_string(),
            )),
        }
    }
}

/// Active jobs, newest first. This ordering is the tie-break for ranked results.
pub(crate) async fn fetch_active_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE active = TRUE ORDER BY posted_at DESC, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(jobs)
}

pub(crate) async fn find_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// GET /api/jobs?location=&title=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<JobListResponse>, AppError> {
    let location = blank_to_none(filter.location);
    let title = blank_to_none(filter.title);

    let jobs = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE active = TRUE
          AND ($1::TEXT IS NULL OR location ILIKE '%' || $1 || '%')
          AND ($2::TEXT IS NULL OR title ILIKE '%' || $2 || '%')
        ORDER BY posted_at DESC, id
        "#,
    )
    .bind(location)
    .bind(title)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let job = find_job(&state.db, job_id).await?;
    Ok(Json(JobResponse { job: job.into() }))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    let (title, company, description) = req.required_fields()?;

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (title, company, description, requirements, location, salary_range)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(company)
    .bind(description)
    .bind(&req.requirements)
    .bind(&req.location)
    .bind(&req.salary_range)
    .fetch_one(&state.db)
    .await?;

    info!("Created job {} ({} at {})", job.id, job.title, job.company);

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            message: "Job created successfully".to_string(),
            job: job.into(),
        }),
    ))
}
