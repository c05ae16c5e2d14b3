//! Shared error type for crawler components.
//!
//! Individual crates may define narrower error enums for their own
//! contracts (see `crawler-fetch::FetchError`, `crawler-store::StoreError`),
//! but anything that crosses a crate boundary as a hard failure (as opposed
//! to a data-shaped result like `FetchResult`) converges on `CrawlerError`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrawlerError>;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("coordinator store error: {0}")]
    Coordinator(String),

    #[error("content store error: {0}")]
    Store(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CrawlerError {
    /// Errors from the durable coordinator/content stores are, per
    /// spec.md §4.1/§4.5/§7, logged and treated as best-effort: they never
    /// abort the in-memory operation that triggered them.
    pub fn is_durability_failure(&self) -> bool {
        matches!(self, CrawlerError::Coordinator(_) | CrawlerError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durability_failures_are_classified() {
        assert!(CrawlerError::Coordinator("x".into()).is_durability_failure());
        assert!(CrawlerError::Store("x".into()).is_durability_failure());
        assert!(!CrawlerError::Configuration("x".into()).is_durability_failure());
    }
}
