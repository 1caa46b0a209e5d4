use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub original_filename: String,
    #[serde(skip_serializing)]
    pub parsed_data: Option<Value>,
    pub skills: Vec<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
