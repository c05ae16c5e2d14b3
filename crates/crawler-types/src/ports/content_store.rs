//! Content store port: durable persistence for parsed pages, behind the
//! file-backend / wide-column-backend split spec.md §6 leaves as a
//! deployment choice (`database.type`).

use async_trait::async_trait;

use crate::content::ParsedContent;
use crate::error::Result;

/// Summary counters a content store can report without a full scan.
#[derive(Debug, Clone, Default)]
pub struct ContentStats {
    pub total_pages: u64,
    pub total_bytes: u64,
}

/// Backend-agnostic interface for durably persisting parsed pages, keyed by
/// URL.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Prepare the backend for use (create directories, tables, indexes).
    /// Called once during scheduler startup; must be safe to call against
    /// an already-initialized backend.
    async fn initialize(&self) -> Result<()>;

    /// Persist `content`, overwriting any prior record for the same URL.
    async fn store(&self, content: &ParsedContent) -> Result<()>;

    /// Fetch the stored record for `url`, if any.
    async fn get(&self, url: &str) -> Result<Option<ParsedContent>>;

    /// Cheaper existence check than `get` for backends that can answer it
    /// without deserializing the full record.
    async fn exists(&self, url: &str) -> Result<bool>;

    async fn stats(&self) -> Result<ContentStats>;

    /// Flush and release any held resources (connections, file handles).
    /// Called once during graceful shutdown.
    async fn close(&self) -> Result<()>;
}
