//! Resolves the skill set a user is matched with.
//!
//! Portfolio skills win; the most recent resume's extracted skills are the fallback.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::skill_match::SkillSet;

/// Reads portfolio skills stored as `{"technical": [...], "soft": [...]}` or a flat list.
/// Any other shape yields an empty set.
pub fn skills_from_portfolio(skills: &Value) -> SkillSet {
    let labels = |v: Option<&Value>| -> Vec<String> {
        v.and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    match skills {
        Value::Object(map) => {
            let mut all = labels(map.get("technical"));
            all.extend(labels(map.get("soft")));
            all.into_iter().collect()
        }
        Value::Array(_) => labels(Some(skills)).into_iter().collect(),
        _ => SkillSet::new(),
    }
}

/// Skills for `user_id`: portfolio first, then the latest uploaded resume.
pub async fn resolve_candidate_skills(pool: &PgPool, user_id: Uuid) -> Result<SkillSet, AppError> {
    let portfolio_skills: Option<Value> =
        sqlx::query_scalar("SELECT skills FROM portfolios WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    if let Some(skills) = portfolio_skills.as_ref().map(skills_from_portfolio) {
        if !skills.is_empty() {
            return Ok(skills);
        }
    }

    let resume_skills: Option<Vec<String>> = sqlx::query_scalar(
        "SELECT skills FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(resume_skills.unwrap_or_default().into_iter().collect())
}
