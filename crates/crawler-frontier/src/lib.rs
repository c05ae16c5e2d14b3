//! Politeness-aware priority frontier: per-host queues, a processed-URL
//! set, and durable mirroring through a `CoordinatorStore`.

mod config;
mod frontier;
mod host;

pub use config::FrontierConfig;
pub use frontier::{Frontier, FrontierStats};
pub use host::origin_of;
