use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::matching::scorer::JobScorer;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Backs the recommendation cache.
    pub redis: RedisClient,
    /// Uploaded resumes and profile pictures. Default: S3BlobStore.
    pub storage: Arc<dyn BlobStore>,
    pub config: Config,
    /// Pluggable job scorer. Default: SkillOverlapScorer.
    pub scorer: Arc<dyn JobScorer>,
}
