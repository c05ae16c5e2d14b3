//! File-backed `ContentStore`.
//!
//! Layout under `data_dir`:
//! ```text
//! content/<sha256(url)[..2]>/<sha256(url)>.json   one file per page
//! index/url_index.json                             url -> content hash
//! ```
//! The two-character shard prefix keeps any single directory from growing
//! unbounded on large crawls, the same trick the Duplicate Detector uses for
//! its own hash bucketing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crawler_types::content::ParsedContent;
use crawler_types::error::{CrawlerError, Result};
use crawler_types::ports::{ContentStats, ContentStore};

pub struct FileContentStore {
    data_dir: PathBuf,
    /// url -> content hash, rebuilt from disk on `initialize`.
    index: RwLock<HashMap<String, String>>,
    total_bytes: AtomicU64,
}

fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{digest:x}")
}

impl FileContentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            index: RwLock::new(HashMap::new()),
            total_bytes: AtomicU64::new(0),
        }
    }

    fn content_dir(&self) -> PathBuf {
        self.data_dir.join("content")
    }

    fn index_path(&self) -> PathBuf {
        self.data_dir.join("index").join("url_index.json")
    }

    fn path_for_hash(&self, hash: &str) -> PathBuf {
        self.content_dir().join(&hash[..2]).join(format!("{hash}.json"))
    }

    async fn write_index(&self, index: &HashMap<String, String>) -> Result<()> {
        let path = self.index_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(index)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    async fn read_index(path: &Path) -> Result<HashMap<String, String>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(CrawlerError::Io(e)),
        }
    }
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn initialize(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.content_dir()).await?;
        if let Some(parent) = self.index_path().parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let loaded = Self::read_index(&self.index_path()).await?;
        let mut total_bytes = 0u64;
        for hash in loaded.values() {
            let path = self.path_for_hash(hash);
            if let Ok(meta) = tokio::fs::metadata(&path).await {
                total_bytes += meta.len();
            }
        }
        self.total_bytes.store(total_bytes, Ordering::Relaxed);

        let count = loaded.len();
        *self.index.write().await = loaded;
        debug!(pages = count, data_dir = %self.data_dir.display(), "file content store initialized");
        Ok(())
    }

    async fn store(&self, content: &ParsedContent) -> Result<()> {
        let hash = url_hash(&content.url);
        let path = self.path_for_hash(&hash);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(content)?;
        let new_len = json.len() as u64;

        let previous_len = match tokio::fs::metadata(&path).await {
            Ok(meta) => Some(meta.len()),
            Err(_) => None,
        };

        tokio::fs::write(&path, &json).await?;

        let mut index = self.index.write().await;
        let is_new = index.insert(content.url.clone(), hash).is_none();
        if is_new || previous_len.is_none() {
            self.total_bytes.fetch_add(new_len, Ordering::Relaxed);
        } else if let Some(prev) = previous_len {
            let delta = new_len as i64 - prev as i64;
            if delta >= 0 {
                self.total_bytes.fetch_add(delta as u64, Ordering::Relaxed);
            } else {
                self.total_bytes.fetch_sub((-delta) as u64, Ordering::Relaxed);
            }
        }
        self.write_index(&index).await?;
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Option<ParsedContent>> {
        let hash = {
            let index = self.index.read().await;
            match index.get(url) {
                Some(hash) => hash.clone(),
                None => return Ok(None),
            }
        };

        let path = self.path_for_hash(&hash);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(url = %url, "index referenced missing content file");
                Ok(None)
            }
            Err(e) => Err(CrawlerError::Io(e)),
        }
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        Ok(self.index.read().await.contains_key(url))
    }

    async fn stats(&self) -> Result<ContentStats> {
        let total_pages = self.index.read().await.len() as u64;
        Ok(ContentStats {
            total_pages,
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
        })
    }

    async fn close(&self) -> Result<()> {
        let index = self.index.read().await;
        self.write_index(&index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(url: &str) -> ParsedContent {
        let mut content = ParsedContent::empty(url);
        content.title = Some("Example".to_string());
        content.content = Some("hello world".to_string());
        content
    }

    #[tokio::test]
    async fn store_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContentStore::new(dir.path());
        store.initialize().await.unwrap();

        let content = sample("https://example.com/a");
        store.store(&content).await.unwrap();

        assert!(store.exists("https://example.com/a").await.unwrap());
        let fetched = store.get("https://example.com/a").await.unwrap().unwrap();
        assert_eq!(fetched.title.as_deref(), Some("Example"));
        assert_eq!(store.stats().await.unwrap().total_pages, 1);
    }

    #[tokio::test]
    async fn missing_url_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContentStore::new(dir.path());
        store.initialize().await.unwrap();
        assert_eq!(store.get("https://example.com/missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn index_survives_reinitialization() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileContentStore::new(dir.path());
            store.initialize().await.unwrap();
            store.store(&sample("https://example.com/a")).await.unwrap();
            store.close().await.unwrap();
        }

        let reopened = FileContentStore::new(dir.path());
        reopened.initialize().await.unwrap();
        assert!(reopened.exists("https://example.com/a").await.unwrap());
    }
}
