//! Multi-strategy duplicate detection backed by in-process mirrors plus a
//! durable coordinator store.

use std::sync::Arc;

use dashmap::DashSet;
use tracing::debug;

use crawler_types::content::{ContentHashBundle, ParsedContent};
use crawler_types::error::Result;
use crawler_types::ports::CoordinatorStore;

use crate::hashes::hash_bundle;

const URL_SET_KEY: &str = "crawler:duplicates:urls";
const CONTENT_SET_KEY: &str = "crawler:duplicates:content";
const TITLE_SET_KEY: &str = "crawler:duplicates:titles";
const FUZZY_SET_KEY: &str = "crawler:duplicates:fuzzy";

/// Outcome of [`DuplicateDetector::check`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateCheck {
    pub url_dup: bool,
    pub content_dup: bool,
    pub title_dup: bool,
    pub fuzzy_dup: bool,
}

impl DuplicateCheck {
    /// `strict` narrows to the two high-confidence signals (exact URL or
    /// exact content); the relaxed form also treats a fuzzy-feature match as
    /// disqualifying. Title duplicates never gate on their own — they are a
    /// tracked signal, not a blocking one.
    pub fn is_duplicate(&self, strict: bool) -> bool {
        if strict {
            self.url_dup || self.content_dup
        } else {
            self.url_dup || self.content_dup || self.fuzzy_dup
        }
    }
}

pub struct DuplicateDetector {
    coordinator: Arc<dyn CoordinatorStore>,
    urls: DashSet<String>,
    content: DashSet<String>,
    titles: DashSet<String>,
    fuzzy: DashSet<String>,
}

impl DuplicateDetector {
    pub fn new(coordinator: Arc<dyn CoordinatorStore>) -> Self {
        Self {
            coordinator,
            urls: DashSet::new(),
            content: DashSet::new(),
            titles: DashSet::new(),
            fuzzy: DashSet::new(),
        }
    }

    /// Load all four sets from durable storage into the in-process mirrors.
    /// Called once during scheduler startup.
    pub async fn initialize(&self) -> Result<()> {
        for (key, set) in [
            (URL_SET_KEY, &self.urls),
            (CONTENT_SET_KEY, &self.content),
            (TITLE_SET_KEY, &self.titles),
            (FUZZY_SET_KEY, &self.fuzzy),
        ] {
            for member in self.coordinator.set_members(key).await? {
                set.insert(member);
            }
        }
        debug!(
            urls = self.urls.len(),
            content = self.content.len(),
            titles = self.titles.len(),
            fuzzy = self.fuzzy.len(),
            "duplicate detector mirrors loaded from durable storage"
        );
        Ok(())
    }

    fn hashes_for(&self, parsed: &ParsedContent) -> ContentHashBundle {
        hash_bundle(parsed)
    }

    /// Pure lookup against the in-process mirrors.
    pub fn check(&self, parsed: &ParsedContent) -> DuplicateCheck {
        let bundle = self.hashes_for(parsed);
        DuplicateCheck {
            url_dup: !bundle.url_hash.is_empty() && self.urls.contains(&bundle.url_hash),
            content_dup: !bundle.content_hash.is_empty() && self.content.contains(&bundle.content_hash),
            title_dup: !bundle.title_hash.is_empty() && self.titles.contains(&bundle.title_hash),
            fuzzy_dup: !bundle.fuzzy_hash.is_empty() && self.fuzzy.contains(&bundle.fuzzy_hash),
        }
    }

    /// Insert all non-empty hashes for `parsed` into both mirrors and
    /// durable sets. Idempotent — re-adding an already-known page is a
    /// no-op in the mirrors and a no-op set member in the coordinator.
    pub async fn add(&self, parsed: &ParsedContent) -> Result<()> {
        let bundle = self.hashes_for(parsed);

        if !bundle.url_hash.is_empty() {
            self.urls.insert(bundle.url_hash.clone());
            self.coordinator.set_add(URL_SET_KEY, &bundle.url_hash).await?;
        }
        if !bundle.content_hash.is_empty() {
            self.content.insert(bundle.content_hash.clone());
            self.coordinator
                .set_add(CONTENT_SET_KEY, &bundle.content_hash)
                .await?;
        }
        if !bundle.title_hash.is_empty() {
            self.titles.insert(bundle.title_hash.clone());
            self.coordinator.set_add(TITLE_SET_KEY, &bundle.title_hash).await?;
        }
        if !bundle.fuzzy_hash.is_empty() {
            self.fuzzy.insert(bundle.fuzzy_hash.clone());
            self.coordinator.set_add(FUZZY_SET_KEY, &bundle.fuzzy_hash).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler_coordinator::InMemoryCoordinatorStore;

    fn page(url: &str, content: &str, title: &str) -> ParsedContent {
        let mut parsed = ParsedContent::empty(url);
        parsed.content = Some(content.to_string());
        parsed.title = Some(title.to_string());
        parsed
    }

    #[tokio::test]
    async fn fresh_page_is_never_a_duplicate() {
        let detector = DuplicateDetector::new(Arc::new(InMemoryCoordinatorStore::new()));
        let check = detector.check(&page("https://example.com/a", "hello world", "Title"));
        assert_eq!(check, DuplicateCheck::default());
        assert!(!check.is_duplicate(false));
    }

    #[tokio::test]
    async fn exact_url_reencounter_is_a_url_duplicate() {
        let detector = DuplicateDetector::new(Arc::new(InMemoryCoordinatorStore::new()));
        let first = page("https://example.com/a", "hello world", "Title");
        detector.add(&first).await.unwrap();

        let check = detector.check(&page(
            "https://example.com/a?utm_source=newsletter",
            "different body entirely",
            "Different Title",
        ));
        assert!(check.url_dup);
        assert!(check.is_duplicate(true));
    }

    #[tokio::test]
    async fn identical_content_on_a_different_url_is_a_content_duplicate() {
        let detector = DuplicateDetector::new(Arc::new(InMemoryCoordinatorStore::new()));
        detector
            .add(&page("https://mirror-a.example/x", "shared body text", "Title"))
            .await
            .unwrap();

        let check = detector.check(&page(
            "https://mirror-b.example/y",
            "shared body text",
            "Unrelated Title",
        ));
        assert!(check.content_dup);
        assert!(!check.url_dup);
        assert!(check.is_duplicate(true));
    }

    #[tokio::test]
    async fn title_duplicate_alone_never_blocks() {
        let detector = DuplicateDetector::new(Arc::new(InMemoryCoordinatorStore::new()));
        detector
            .add(&page("https://a.example/1", "first unique body", "Shared Title"))
            .await
            .unwrap();

        let check = detector.check(&page(
            "https://a.example/2",
            "completely different unique body",
            "Shared Title",
        ));
        assert!(check.title_dup);
        assert!(!check.is_duplicate(false));
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let detector = DuplicateDetector::new(Arc::new(InMemoryCoordinatorStore::new()));
        let p = page("https://example.com/a", "hello world", "Title");
        detector.add(&p).await.unwrap();
        detector.add(&p).await.unwrap();
        assert_eq!(detector.urls.len(), 1);
    }
}
