pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{auth, jobs, matching, portfolio, resume, storage, users};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        // Users
        .route(
            "/api/users/:id",
            get(users::handlers::handle_get_user).put(users::handlers::handle_update_user),
        )
        .route(
            "/api/users/:id/upload-picture",
            post(users::handlers::handle_upload_picture),
        )
        // Portfolio
        .route(
            "/api/portfolio/:user_id",
            get(portfolio::handlers::handle_get_portfolio)
                .post(portfolio::handlers::handle_upsert_portfolio)
                .put(portfolio::handlers::handle_upsert_portfolio),
        )
        // Resumes
        .route(
            "/api/resumes/upload",
            post(resume::handlers::handle_upload_resume),
        )
        .route(
            "/api/resumes/analyze",
            post(resume::handlers::handle_analyze_resume),
        )
        .route(
            "/api/resumes/:user_id",
            get(resume::handlers::handle_list_resumes),
        )
        // Jobs and matching
        .route(
            "/api/jobs",
            get(jobs::handlers::handle_list_jobs).post(jobs::handlers::handle_create_job),
        )
        .route(
            "/api/jobs/recommendations/:user_id",
            get(matching::handlers::handle_recommendations),
        )
        .route(
            "/api/jobs/match",
            post(matching::handlers::handle_create_match),
        )
        .route(
            "/api/jobs/matches/:user_id",
            get(matching::handlers::handle_list_matches),
        )
        .route(
            "/api/jobs/similar/:user_id",
            get(matching::handlers::handle_similar_jobs),
        )
        .route("/api/jobs/:id", get(jobs::handlers::handle_get_job))
        .route(
            "/api/jobs/:id/skill-gap",
            get(matching::handlers::handle_skill_gap),
        )
        // Stored uploads
        .route("/uploads/*key", get(storage::handlers::handle_get_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
