//! ScyllaDB-backed `ContentStore` for production-scale, multi-instance
//! crawls where a single file-backed instance would not scale (spec.md §6
//! `database.type: cassandra`).
//!
//! The teacher repo has no Cassandra/Scylla client of its own; this adapter
//! is grounded on the `scylla` crate's own session/prepared-statement API
//! and follows this workspace's other store adapter in shape (one
//! `initialize`/`store`/`get`/`exists`/`stats`/`close` implementation per
//! backend, logged with `tracing` the way `FileContentStore` is).

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use scylla::{Session, SessionBuilder};
use tracing::{debug, info};

use crawler_types::content::ParsedContent;
use crawler_types::error::{CrawlerError, Result};
use crawler_types::ports::{ContentStats, ContentStore};

#[derive(Debug, Clone)]
pub struct ScyllaContentStoreConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u32,
}

impl Default for ScyllaContentStoreConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["127.0.0.1:9042".to_string()],
            keyspace: "crawler".to_string(),
            replication_factor: 1,
        }
    }
}

pub struct ScyllaContentStore {
    session: Session,
    keyspace: String,
    replication_factor: AtomicU32,
}

fn store_err(e: impl std::fmt::Display) -> CrawlerError {
    CrawlerError::Store(e.to_string())
}

impl ScyllaContentStore {
    pub async fn connect(config: ScyllaContentStoreConfig) -> Result<Self> {
        info!(hosts = ?config.hosts, "connecting to Scylla content store");
        let mut builder = SessionBuilder::new();
        for host in &config.hosts {
            builder = builder.known_node(host);
        }
        let session = builder.build().await.map_err(store_err)?;
        Ok(Self {
            session,
            keyspace: config.keyspace,
            replication_factor: AtomicU32::new(config.replication_factor),
        })
    }
}

#[async_trait]
impl ContentStore for ScyllaContentStore {
    async fn initialize(&self) -> Result<()> {
        let replication_factor = self.replication_factor.load(Ordering::Relaxed);
        let create_keyspace = format!(
            "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
            self.keyspace, replication_factor
        );
        self.session.query(create_keyspace, &[]).await.map_err(store_err)?;

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {}.pages (url text PRIMARY KEY, body text, fetched_at timestamp)",
            self.keyspace
        );
        self.session.query(create_table, &[]).await.map_err(store_err)?;
        debug!(keyspace = %self.keyspace, "scylla content store schema ready");
        Ok(())
    }

    async fn store(&self, content: &ParsedContent) -> Result<()> {
        let body = serde_json::to_string(content)?;
        let query = format!(
            "INSERT INTO {}.pages (url, body, fetched_at) VALUES (?, ?, toTimestamp(now()))",
            self.keyspace
        );
        self.session
            .query(query, (content.url.clone(), body))
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Option<ParsedContent>> {
        let query = format!("SELECT body FROM {}.pages WHERE url = ?", self.keyspace);
        let result = self
            .session
            .query(query, (url.to_string(),))
            .await
            .map_err(store_err)?;

        let Some(rows) = result.rows else {
            return Ok(None);
        };
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        let (body,): (String,) = row.into_typed().map_err(store_err)?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.get(url).await?.is_some())
    }

    async fn stats(&self) -> Result<ContentStats> {
        // COUNT(*) is a full scan in Cassandra/Scylla; acceptable here
        // because crawl runs are bounded and this is a diagnostics path,
        // not something the worker loop calls per page.
        let query = format!("SELECT COUNT(*) FROM {}.pages", self.keyspace);
        let result = self.session.query(query, &[]).await.map_err(store_err)?;
        let total_pages = result
            .rows
            .and_then(|rows| rows.into_iter().next())
            .and_then(|row| row.into_typed::<(i64,)>().ok())
            .map(|(count,)| count as u64)
            .unwrap_or(0);
        Ok(ContentStats {
            total_pages,
            total_bytes: 0,
        })
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
