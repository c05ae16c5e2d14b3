//! Redis-backed `CoordinatorStore`, grounded on `riptide-workers`'s
//! `JobQueue`: a `MultiplexedConnection` shared behind a clone-friendly
//! handle, namespaced keys, and `redis::pipe()` for the one place we need
//! more than one command to land atomically.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, info};

use crawler_types::error::{CrawlerError, Result};
use crawler_types::ports::CoordinatorStore;

#[derive(Debug, Clone)]
pub struct RedisCoordinatorStoreConfig {
    pub url: String,
    /// Key prefix so multiple crawler deployments can share one Redis
    /// instance without colliding.
    pub namespace: String,
}

impl Default for RedisCoordinatorStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            namespace: "crawler".to_string(),
        }
    }
}

pub struct RedisCoordinatorStore {
    conn: redis::aio::MultiplexedConnection,
    namespace: String,
}

impl RedisCoordinatorStore {
    pub async fn connect(config: RedisCoordinatorStoreConfig) -> Result<Self> {
        info!(url = %config.url, "connecting to coordinator Redis");
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| CrawlerError::Coordinator(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CrawlerError::Coordinator(format!("failed to connect: {e}")))?;
        Ok(Self {
            conn,
            namespace: config.namespace,
        })
    }

    fn ns_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl CoordinatorStore for RedisCoordinatorStore {
    async fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let added: i64 = conn
            .sadd(self.ns_key(key), member)
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))?;
        Ok(added > 0)
    }

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.sismember(self.ns_key(key), member)
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))
    }

    async fn set_len(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        conn.scard(self.ns_key(key))
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.smembers(self.ns_key(key))
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))
    }

    async fn list_push_back(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .rpush(self.ns_key(key), value)
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))?;
        Ok(())
    }

    async fn list_remove_value(&self, key: &str, value: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        // LREM with count=1 removes the first occurrence scanning head to
        // tail, matching the Frontier's "remove first equal serialization"
        // contract exactly.
        let removed: i64 = conn
            .lrem(self.ns_key(key), 1, value)
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn list_range(&self, key: &str, offset: i64, limit: i64) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let stop = if limit <= 0 { -1 } else { offset + limit - 1 };
        conn.lrange(self.ns_key(key), offset as isize, stop as isize)
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))
    }

    async fn list_len(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        conn.llen(self.ns_key(key))
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        debug!(key = %key, "deleting coordinator key");
        let _: i64 = conn
            .del(self.ns_key(key))
            .await
            .map_err(|e| CrawlerError::Coordinator(e.to_string()))?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| CrawlerError::Coordinator(format!("ping failed: {e}")))?;
        Ok(())
    }
}
