//! Coordinator store adapters implementing `crawler_types::ports::CoordinatorStore`.
//!
//! Two backends are provided: [`RedisCoordinatorStore`] for real multi-instance
//! deployments, and [`InMemoryCoordinatorStore`] for single-process runs and
//! tests (`--dry-run`, unit/integration tests across the workspace).

mod memory_store;
mod redis_store;

pub use memory_store::InMemoryCoordinatorStore;
pub use redis_store::{RedisCoordinatorStore, RedisCoordinatorStoreConfig};
