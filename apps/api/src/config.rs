use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::skill_match::DEFAULT_MATCH_SCORE;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Score given to jobs without parseable required skills.
    pub default_match_score: f64,
    pub recommendation_limit: usize,
    pub recommendation_cache_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_match_score = parse_or(
            "DEFAULT_MATCH_SCORE",
            optional_env("DEFAULT_MATCH_SCORE"),
            DEFAULT_MATCH_SCORE,
        )?;
        if !(0.0..=1.0).contains(&default_match_score) {
            bail!("DEFAULT_MATCH_SCORE must be within [0, 1], got {default_match_score}");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: parse_or("PORT", optional_env("PORT"), 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            default_match_score,
            recommendation_limit: parse_or(
                "RECOMMENDATION_LIMIT",
                optional_env("RECOMMENDATION_LIMIT"),
                10,
            )?,
            recommendation_cache_ttl_secs: parse_or(
                "RECOMMENDATION_CACHE_TTL_SECS",
                optional_env("RECOMMENDATION_CACHE_TTL_SECS"),
                300,
            )?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                optional_env("MAX_UPLOAD_BYTES"),
                10 * 1024 * 1024,
            )?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{value}'")),
        None => Ok(default),
    }
}
