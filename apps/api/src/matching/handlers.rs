//! Axum route handlers for recommendations, explicit matches, skill gaps and
//! text similarity.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::handlers::{fetch_active_jobs, find_job};
use crate::jobs::requirements::{parse_requirements, required_skill_set};
use crate::matching::cache::RecommendationCache;
use crate::matching::candidate::resolve_candidate_skills;
use crate::matching::gap::{analyze_gaps, GapReport};
use crate::matching::recommender::{recommend_jobs, Recommendation};
use crate::matching::skill_match::SkillSet;
use crate::matching::tfidf::profile_similarities;
use crate::models::job::JobRow;
use crate::models::job_match::UserJobMatchRow;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::handlers::find_user;

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub match_score: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
}

#[derive(Debug, Serialize)]
pub struct MatchWithJob {
    #[serde(flatten)]
    pub job_match: UserJobMatchRow,
    pub job: Option<JobRow>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchWithJob>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillGapQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub job_id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub report: GapReport,
}

#[derive(Debug, Serialize)]
pub struct SimilarJob {
    pub job_id: Uuid,
    pub job: JobRow,
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct SimilarJobsResponse {
    pub similar_jobs: Vec<SimilarJob>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/jobs/recommendations/:user_id
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    find_user(&state.db, user_id).await?;

    let mut cache =
        RecommendationCache::connect(&state.redis, state.config.recommendation_cache_ttl_secs)
            .await;
    if let Some(cached) = cache.get::<RecommendationsResponse>(user_id).await {
        return Ok(Json(cached));
    }

    let candidate = resolve_candidate_skills(&state.db, user_id).await?;
    let jobs = fetch_active_jobs(&state.db).await?;
    let recommendations = recommend_jobs(
        &candidate,
        jobs,
        state.scorer.as_ref(),
        state.config.recommendation_limit,
    );

    info!(
        "Computed {} recommendations for user {user_id} ({} candidate skills, scorer={})",
        recommendations.len(),
        candidate.len(),
        state.scorer.backend()
    );

    let response = RecommendationsResponse { recommendations };
    cache.store(user_id, &response).await;

    Ok(Json(response))
}

/// POST /api/jobs/match
pub async fn handle_create_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), AppError> {
    let (Some(user_id), Some(job_id)) = (req.user_id, req.job_id) else {
        return Err(AppError::Validation(
            "user_id and job_id are required".to_string(),
        ));
    };

    find_user(&state.db, user_id).await?;
    let job = find_job(&state.db, job_id).await?;

    let candidate = resolve_candidate_skills(&state.db, user_id).await?;
    let required = required_skill_set(job.requirements.as_ref());
    let result = state.scorer.score(&candidate, &required);

    let row = sqlx::query_as::<_, UserJobMatchRow>(
        r#"
        INSERT INTO user_job_matches (user_id, job_id, match_score, matched_skills, missing_skills)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(job_id)
    .bind(result.score)
    .bind(result.matched.to_vec())
    .bind(result.missing.to_vec())
    .fetch_one(&state.db)
    .await?;

    info!(
        "Stored match {} for user {user_id} / job {job_id}: score {:.3}",
        row.id, result.score
    );

    Ok((
        StatusCode::CREATED,
        Json(MatchResponse {
            match_id: row.id,
            match_score: result.score,
            matched_skills: result.matched,
            missing_skills: result.missing,
        }),
    ))
}

/// GET /api/jobs/matches/:user_id
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MatchListResponse>, AppError> {
    find_user(&state.db, user_id).await?;

    let rows = sqlx::query_as::<_, UserJobMatchRow>(
        "SELECT * FROM user_job_matches WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    let job_ids: Vec<Uuid> = rows.iter().map(|m| m.job_id).collect();
    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ANY($1)")
        .bind(&job_ids)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(MatchListResponse {
        matches: attach_jobs(rows, jobs),
    }))
}

/// GET /api/jobs/:id/skill-gap?user_id=
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<SkillGapQuery>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let user_id = query
        .user_id
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;

    find_user(&state.db, user_id).await?;
    let job = find_job(&state.db, job_id).await?;

    let candidate = resolve_candidate_skills(&state.db, user_id).await?;
    let requirements = parse_requirements(job.requirements.as_ref());
    let report = analyze_gaps(&candidate, &requirements);

    Ok(Json(SkillGapResponse {
        job_id,
        user_id,
        report,
    }))
}

/// GET /api/jobs/similar/:user_id
pub async fn handle_similar_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SimilarJobsResponse>, AppError> {
    let user = find_user(&state.db, user_id).await?;
    let candidate = resolve_candidate_skills(&state.db, user_id).await?;
    let jobs = fetch_active_jobs(&state.db).await?;

    let similar_jobs = rank_by_similarity(
        &profile_text(&user, &candidate),
        jobs,
        state.config.recommendation_limit,
    );

    Ok(Json(SimilarJobsResponse { similar_jobs }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Headline, summary, profession and skills joined into one document.
fn profile_text(user: &User, skills: &SkillSet) -> String {
    [&user.headline, &user.summary, &user.profession]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .chain(skills.iter())
        .collect::<Vec<_>>()
        .join(" ")
}

fn rank_by_similarity(profile: &str, jobs: Vec<JobRow>, limit: usize) -> Vec<SimilarJob> {
    let texts: Vec<String> = jobs
        .iter()
        .map(|job| format!("{} {}", job.title, job.description))
        .collect();
    let scores = profile_similarities(profile, &texts);

    let mut ranked: Vec<SimilarJob> = jobs
        .into_iter()
        .zip(scores)
        .map(|(job, similarity)| SimilarJob {
            job_id: job.id,
            job,
            similarity,
        })
        .collect();
    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    ranked.truncate(limit);
    ranked
}

fn attach_jobs(rows: Vec<UserJobMatchRow>, jobs: Vec<JobRow>) -> Vec<MatchWithJob> {
    let by_id: HashMap<Uuid, JobRow> = jobs.into_iter().map(|j| (j.id, j)).collect();
    rows.into_iter()
        .map(|job_match| {
            // several matches may point at one job
            let job = by_id.get(&job_match.job_id).cloned();
            MatchWithJob { job_match, job }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::recommender::tests::make_job;
    use chrono::Utc;

    fn user_with(headline: Option<&str>, summary: Option<&str>, profession: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            location: None,
            headline: headline.map(str::to_string),
            summary: summary.map(str::to_string),
            profession: profession.map(str::to_string),
            profile_picture: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_text_skips_missing_fields() {
        let user = user_with(Some("Data Scientist"), None, Some("Analyst"));
        let skills: SkillSet = ["Python", "SQL"].iter().collect();
        assert_eq!(profile_text(&user, &skills), "Data Scientist Analyst Python SQL");
    }

    #[test]
    fn test_similarity_ranking_prefers_overlapping_text() {
        let mut java = make_job("Java Developer", None);
        java.description = "Spring framework and enterprise services".to_string();
        let mut ml = make_job("Machine Learning Engineer", None);
        ml.description = "Python, machine learning and data analysis".to_string();

        let ranked = rank_by_similarity(
            "Python developer experienced in machine learning",
            vec![java, ml],
            10,
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].job.title, "Machine Learning Engineer");
        assert!(ranked[0].similarity > ranked[1].similarity);
    }

    #[test]
    fn test_similarity_ranking_respects_limit() {
        let jobs: Vec<JobRow> = (0..5).map(|i| make_job(&format!("Job {i}"), None)).collect();
        assert_eq!(rank_by_similarity("anything", jobs, 3).len(), 3);
    }

    #[test]
    fn test_attach_jobs_shares_job_between_matches() {
        let job = make_job("Analyst", None);
        let row = |score: f64| UserJobMatchRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_id: job.id,
            match_score: score,
            matched_skills: vec![],
            missing_skills: vec![],
            created_at: Utc::now(),
        };
        let matches = attach_jobs(vec![row(0.5), row(1.0)], vec![job.clone()]);
        assert!(matches.iter().all(|m| m.job.as_ref().map(|j| j.id) == Some(job.id)));

        let value = serde_json::to_value(&matches[1]).unwrap();
        assert_eq!(value["match_score"], 1.0);
        assert_eq!(value["job"]["title"], "Analyst");
    }

    #[test]
    fn test_match_request_tolerates_missing_fields() {
        let req: MatchRequest = serde_json::from_str(r#"{"user_id": null}"#).unwrap();
        assert!(req.user_id.is_none() && req.job_id.is_none());
    }
}
