//! Redis cache for derived per-ticker analytics.
//!
//! Redis is optional: without `REDIS_URL` the cache degrades to a no-op so
//! scoring runs still complete, and individual cache failures are logged
//! and swallowed rather than failing a batch.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use scoring_core::AnalyticsError;
use serde::Serialize;

#[derive(Clone)]
pub struct AnalyticsCache {
    conn: Option<ConnectionManager>,
}

impl AnalyticsCache {
    /// Connect from `REDIS_URL`. Unset config yields a no-op cache with a
    /// one-time warning; a failed connection is a real error since the
    /// operator asked for Redis and didn't get it.
    pub async fn connect_from_env() -> Result<Self, AnalyticsError> {
        let url = match std::env::var("REDIS_URL") {
            Ok(url) => url,
            Err(_) => {
                tracing::warn!("REDIS_URL not set; caching disabled for this run");
                return Ok(Self { conn: None });
            }
        };

        let client =
            redis::Client::open(url).map_err(|e| AnalyticsError::Cache(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AnalyticsError::Cache(e.to_string()))?;

        Ok(Self { conn: Some(conn) })
    }

    /// A cache that never stores anything, for tests and Redis-less runs.
    pub fn disabled() -> Self {
        Self { conn: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some()
    }

    /// Cache the latest indicator set for a ticker.
    pub async fn set_indicators<T: Serialize>(&self, symbol: &str, value: &T) {
        self.set_json(&format!("analytics:{symbol}"), value).await;
    }

    /// Cache the latest composite score for a ticker.
    pub async fn set_composite<T: Serialize>(&self, symbol: &str, value: &T) {
        self.set_json(&format!("composite:{symbol}"), value).await;
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let Some(conn) = &self.conn else {
            return;
        };
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("cache serialization failed for {key}: {e}");
                return;
            }
        };
        let mut conn = conn.clone();
        if let Err(e) = conn.set::<_, _, ()>(key, json).await {
            tracing::warn!("cache set failed for {key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_cache_swallows_writes() {
        let cache = AnalyticsCache::disabled();
        assert!(!cache.is_enabled());
        // A no-op cache must accept writes without a connection.
        cache.set_indicators("TEST", &serde_json::json!({"sma20": 15.5})).await;
        cache.set_composite("TEST", &serde_json::json!({"total_score": 0.3})).await;
    }
}
