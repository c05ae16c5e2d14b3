//! Content store adapters implementing `crawler_types::ports::ContentStore`.
//!
//! [`FileContentStore`] is the default backend (spec.md §6 `database.type:
//! file`): one JSON file per page plus a flat URL index, suited to a single
//! instance. [`ScyllaContentStore`] is the wide-column backend for
//! production-scale, multi-instance deployments (`database.type: cassandra`).

mod file_store;
mod scylla_store;

pub use file_store::FileContentStore;
pub use scylla_store::{ScyllaContentStore, ScyllaContentStoreConfig};
