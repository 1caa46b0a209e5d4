//! Axum route handlers for the Portfolio API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::cache::invalidate_recommendations;
use crate::models::portfolio::PortfolioRow;
use crate::state::AppState;
use crate::users::handlers::find_user;

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub portfolio: Value,
}

#[derive(Debug, Serialize)]
pub struct PortfolioUpdateResponse {
    pub message: String,
    pub portfolio: PortfolioRow,
}

/// Upsert body. Only fields present in the request are written.
#[derive(Debug, Default, Deserialize)]
pub struct PortfolioUpdateRequest {
    pub skills: Option<Value>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub projects: Option<Value>,
    pub certifications: Option<Value>,
    pub preferences: Option<Value>,
}

impl PortfolioUpdateRequest {
    fn normalized(self) -> Self {
        Self {
            skills: self.skills.map(decode_embedded_json),
            experience: self.experience.map(decode_embedded_json),
            education: self.education.map(decode_embedded_json),
            projects: self.projects.map(decode_embedded_json),
            certifications: self.certifications.map(decode_embedded_json),
            preferences: self.preferences.map(decode_embedded_json),
        }
    }
}

/// Older clients send sections as JSON-encoded strings; decode those in place.
fn decode_embedded_json(value: Value) -> Value {
    match &value {
        Value::String(s) => serde_json::from_str(s).unwrap_or(value),
        _ => value,
    }
}

/// Portfolio returned for users who have not saved one yet.
pub fn empty_portfolio(user_id: Uuid) -> Value {
    json!({
        "user_id": user_id,
        "skills": {"technical": [], "soft": []},
        "experience": [],
        "education": [],
        "projects": [],
        "certifications": [],
        "preferences": {}
    })
}

/// GET /api/portfolio/:user_id
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let portfolio = sqlx::query_as::<_, PortfolioRow>("SELECT * FROM portfolios WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

    let portfolio = match portfolio {
        Some(row) => serde_json::to_value(row).map_err(|e| AppError::Internal(e.into()))?,
        None => empty_portfolio(user_id),
    };

    Ok(Json(PortfolioResponse { portfolio }))
}

/// POST|PUT /api/portfolio/:user_id
pub async fn handle_upsert_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<PortfolioUpdateRequest>,
) -> Result<Json<PortfolioUpdateResponse>, AppError> {
    find_user(&state.db, user_id).await?;
    let req = req.normalized();

    let portfolio = sqlx::query_as::<_, PortfolioRow>(
        r#"
        INSERT INTO portfolios
            (user_id, skills, experience, education, projects, certifications, preferences)
        VALUES (
            $1,
            COALESCE($2, '{"technical": [], "soft": []}'::jsonb),
            COALESCE($3, '[]'::jsonb),
            COALESCE($4, '[]'::jsonb),
            COALESCE($5, '[]'::jsonb),
            COALESCE($6, '[]'::jsonb),
            COALESCE($7, '{}'::jsonb)
        )
        ON CONFLICT (user_id) DO UPDATE SET
            skills         = COALESCE($2, portfolios.skills),
            experience     = COALESCE($3, portfolios.experience),
            education      = COALESCE($4, portfolios.education),
            projects       = COALESCE($5, portfolios.projects),
            certifications = COALESCE($6, portfolios.certifications),
            preferences    = COALESCE($7, portfolios.preferences),
            updated_at     = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&req.skills)
    .bind(&req.experience)
    .bind(&req.education)
    .bind(&req.projects)
    .bind(&req.certifications)
    .bind(&req.preferences)
    .fetch_one(&state.db)
    .await?;

    info!("Saved portfolio for user {user_id}");
    invalidate_recommendations(&state.redis, user_id).await;

    Ok(Json(PortfolioUpdateResponse {
        message: "Portfolio updated successfully".to_string(),
        portfolio,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_portfolio_shape() {
        let portfolio = empty_portfolio(Uuid::nil());
        assert_eq!(portfolio["skills"], json!({"technical": [], "soft": []}));
        assert_eq!(portfolio["experience"], json!([]));
        assert_eq!(portfolio["preferences"], json!({}));
    }

    #[test]
    fn test_embedded_json_strings_are_decoded() {
        let decoded = decode_embedded_json(Value::String(r#"["python","sql"]"#.to_string()));
        assert_eq!(decoded, json!(["python", "sql"]));
    }

    #[test]
    fn test_plain_strings_are_kept() {
        let decoded = decode_embedded_json(Value::String("not json".to_string()));
        assert_eq!(decoded, json!("not json"));
    }

    #[test]
    fn test_absent_fields_stay_none() {
        let req: PortfolioUpdateRequest =
            serde_json::from_value(json!({"skills": {"technical": ["Rust"], "soft": []}})).unwrap();
        let req = req.normalized();
        assert!(req.skills.is_some());
        assert!(req.experience.is_none());
        assert!(req.preferences.is_none());
    }
}
