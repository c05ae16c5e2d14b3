//! Coordinator store port: the shared state the Frontier and Duplicate
//! Detector use to stay consistent across crawler instances.
//!
//! Modeled as two primitives — sets (membership) and lists (FIFO-ish
//! collections with first-match removal) — because that is all the
//! Frontier's per-host queues and the Duplicate Detector's hash sets
//! actually need; a richer pub/sub or leader-election surface (as seen on
//! `riptide_types::ports::DistributedCoordination`) is out of scope here.

use async_trait::async_trait;

use crate::error::Result;

/// Backend-agnostic interface for the durable coordination state that lets
/// multiple crawler instances share frontier queues and dedup indexes.
///
/// Implementations must be `Send + Sync`: the scheduler's worker pool calls
/// through a shared `Arc<dyn CoordinatorStore>`.
#[async_trait]
pub trait CoordinatorStore: Send + Sync {
    /// Add `member` to the set named `key`. Returns `true` if it was not
    /// already present.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool>;

    /// Test membership in the set named `key`.
    async fn set_contains(&self, key: &str, member: &str) -> Result<bool>;

    /// Number of members currently in the set named `key`.
    async fn set_len(&self, key: &str) -> Result<u64>;

    /// All members of the set named `key`, in unspecified order. Used to
    /// rebuild in-process mirrors (e.g. the Duplicate Detector's hash sets)
    /// from durable storage on startup.
    async fn set_members(&self, key: &str) -> Result<Vec<String>>;

    /// Append `value` to the back of the list named `key`.
    async fn list_push_back(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the first element equal to `value`, scanning from the front.
    /// Returns `true` if an element was removed. Used by the Frontier to
    /// retire the specific serialized task `next()` selected, which need
    /// not be the head of the list once priority ordering is applied.
    async fn list_remove_value(&self, key: &str, value: &str) -> Result<bool>;

    /// Read up to `limit` elements starting at `offset`, front to back.
    /// Used for frontier inspection and for rebuilding in-memory mirrors
    /// after a restart.
    async fn list_range(&self, key: &str, offset: i64, limit: i64) -> Result<Vec<String>>;

    /// Number of elements currently in the list named `key`.
    async fn list_len(&self, key: &str) -> Result<u64>;

    /// Delete a key (set or list) entirely, e.g. when a host's queue drains.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lightweight liveness probe; the scheduler calls this during startup
    /// so a misconfigured coordinator fails fast instead of surfacing as
    /// mysterious per-task errors later.
    async fn ping(&self) -> Result<()>;
}
