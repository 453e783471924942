use std::{env, time::Duration};

use crate::service::WriteMode;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    /// Note: Only used when the `memory` cache feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "recipehub.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` or `chan-redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// How update and delete commands are applied (default: direct)
    pub write_mode: WriteMode,
    /// Durable subscriber id for the mutation consumer
    /// (default: "recipehub@{HOSTNAME}")
    pub subscriber_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "recipehub.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `WRITE_MODE` - "direct" or "event" (default: "direct")
    /// - `SUBSCRIBER_ID` - Durable subscriber id for the mutation consumer
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "recipehub.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            write_mode: parse_write_mode(env::var("WRITE_MODE").ok().as_deref()),
            subscriber_id: env::var("SUBSCRIBER_ID").unwrap_or_else(|_| default_subscriber_id()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_write_mode(value: Option<&str>) -> WriteMode {
    match value {
        Some(v) if v.eq_ignore_ascii_case("event") => WriteMode::Event,
        Some(v) if v.eq_ignore_ascii_case("direct") => WriteMode::Direct,
        Some(other) => {
            tracing::warn!(value = other, "Unknown WRITE_MODE, falling back to direct");
            WriteMode::Direct
        }
        None => WriteMode::Direct,
    }
}

fn default_subscriber_id() -> String {
    let host = env::var("HOSTNAME").unwrap_or_else(|_| "local".to_string());
    format!("recipehub@{}", host)
}
