//! Redis response cache
//!
//! Cache-aside layer for read endpoints. The cache is a soft dependency:
//! connection attempts run through the shared backoff policy and a Redis
//! that never comes up leaves the service running uncached. Every cache
//! error degrades to a miss; correctness never depends on the cache.

use aftercare_common::backoff::{BackoffPolicy, TokioClock};
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{info, warn};

/// A cached envelope plus the moment it was stored
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    body: serde_json::Value,
}

/// Response cache around an optional Redis connection
#[derive(Clone)]
pub struct ResponseCache {
    conn: Option<ConnectionManager>,
    ttl_secs: u64,
}

impl ResponseCache {
    /// Cache key for a request: `cache:<METHOD>:<path+query>`
    pub fn key(method: &str, path_and_query: &str) -> String {
        format!("cache:{method}:{path_and_query}")
    }

    /// Connect to Redis, retrying per `policy`; a Redis that stays down
    /// yields a disabled cache rather than an error.
    pub async fn connect(redis_url: Option<&str>, ttl_secs: u64, policy: BackoffPolicy) -> Self {
        let Some(url) = redis_url else {
            return Self::disabled();
        };

        let client = match redis::Client::open(url) {
            Ok(client) => client,
            Err(err) => {
                warn!(error = %err, "Invalid Redis URL, running without cache");
                return Self::disabled();
            }
        };

        let clock = TokioClock;
        match policy
            .retry(&clock, "redis connect", || client.get_connection_manager())
            .await
        {
            Ok(conn) => {
                info!("Connected to Redis response cache (TTL {ttl_secs}s)");
                Self {
                    conn: Some(conn),
                    ttl_secs,
                }
            }
            Err(err) => {
                warn!(error = %err, "Redis not available, running without cache");
                Self::disabled()
            }
        }
    }

    /// Cache disabled: every get is a miss, every put a no-op
    pub fn disabled() -> Self {
        Self {
            conn: None,
            ttl_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    /// Fetch a cached envelope; returns the body and the store time
    pub async fn get(&self, key: &str) -> Option<(serde_json::Value, DateTime<Utc>)> {
        let mut conn = self.conn.clone()?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) => Some((entry.body, entry.stored_at)),
                Err(err) => {
                    warn!(key, error = %err, "Discarding corrupt cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    /// Store an envelope under `key` with the configured TTL
    pub async fn put(&self, key: &str, body: &serde_json::Value) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let entry = CacheEntry {
            stored_at: Utc::now(),
            body: body.clone(),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "Failed to serialize cache entry");
                return;
            }
        };
        if let Err(err) = conn.set_ex::<_, _, ()>(key, raw, self.ttl_secs).await {
            warn!(key, error = %err, "Cache write failed");
        }
    }
}
