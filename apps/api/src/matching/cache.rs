//! Redis cache for recommendation payloads.
//!
//! Best-effort: every failure or timeout is logged and treated as a miss.
//! Entries are invalidated whenever the inputs to a user's skill set change
//! (portfolio upsert, resume upload).

use std::future::Future;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{Client as RedisClient, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// Upper bound on connecting and on each command.
const REDIS_TIMEOUT: Duration = Duration::from_millis(500);

pub fn recommendations_key(user_id: Uuid) -> String {
    format!("recommendations:{user_id}")
}

/// Runs a Redis future under `REDIS_TIMEOUT`, logging failures.
async fn bounded<T, F>(what: &str, fut: F) -> Option<T>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(REDIS_TIMEOUT, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("Redis {what} failed: {e}");
            None
        }
        Err(_) => {
            warn!("Redis {what} timed out after {REDIS_TIMEOUT:?}");
            None
        }
    }
}

async fn connect(redis: &RedisClient) -> Option<MultiplexedConnection> {
    bounded("connect", redis.get_multiplexed_async_connection()).await
}

/// One Redis connection shared by the lookup and the write-back of a request.
pub struct RecommendationCache {
    con: Option<MultiplexedConnection>,
    ttl_secs: u64,
}

impl RecommendationCache {
    /// Connects once. An unreachable Redis leaves the cache disabled for this request.
    pub async fn connect(redis: &RedisClient, ttl_secs: u64) -> Self {
        let con = if ttl_secs == 0 { None } else { connect(redis).await };
        Self { con, ttl_secs }
    }

    pub fn is_enabled(&self) -> bool {
        self.con.is_some()
    }

    pub async fn get<T: DeserializeOwned>(&mut self, user_id: Uuid) -> Option<T> {
        let con = self.con.as_mut()?;
        let key = recommendations_key(user_id);

        let Some(raw) = bounded(
            "GET",
            redis::cmd("GET")
                .arg(&key)
                .query_async::<_, Option<String>>(con),
        )
        .await
        else {
            // a stalled server would stall the write-back too
            self.con = None;
            return None;
        };

        match serde_json::from_str(&raw?) {
            Ok(value) => {
                debug!("Recommendation cache hit for user {user_id}");
                Some(value)
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    pub async fn store<T: Serialize>(&mut self, user_id: Uuid, payload: &T) {
        let Some(con) = self.con.as_mut() else {
            return;
        };
        let raw = match serde_json::to_string(payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize recommendations for cache: {e}");
                return;
            }
        };

        bounded(
            "SET",
            redis::cmd("SET")
                .arg(recommendations_key(user_id))
                .arg(raw)
                .arg("EX")
                .arg(self.ttl_secs)
                .query_async::<_, ()>(con),
        )
        .await;
    }
}

pub async fn invalidate_recommendations(redis: &RedisClient, user_id: Uuid) {
    let Some(mut con) = connect(redis).await else {
        return;
    };
    bounded(
        "DEL",
        redis::cmd("DEL")
            .arg(recommendations_key(user_id))
            .query_async::<_, ()>(&mut con),
    )
    .await;
}
