//! Shared data model, error types, configuration schema, and capability
//! ports for the polite web crawler workspace.
//!
//! Every other crate in the workspace depends on this one; it carries no
//! dependency on any other workspace crate.

pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod ports;
pub mod task;

pub use config::{
    AppConfig, CassandraDatabaseSection, CrawlerSection, DatabaseSection, FileDatabaseSection,
    LoggingSection, MonitoringSection, RedisSection,
};
pub use content::{ContentHashBundle, ParsedContent};
pub use error::{CrawlerError, Result};
pub use fetch::FetchResult;
pub use ports::{ContentStats, ContentStore, CoordinatorStore};
pub use task::{Priority, UrlTask};
