use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A job listing. `requirements` is free-form JSON; see `jobs::requirements`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(skip_serializing)]
    pub requirements: Option<Value>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub active: bool,
}
