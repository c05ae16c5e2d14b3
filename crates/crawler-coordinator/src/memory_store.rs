//! In-memory `CoordinatorStore`, used for `--dry-run` and by every crate's
//! test suite that needs a `CoordinatorStore` double without a Redis
//! dependency.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

use crawler_types::error::Result;
use crawler_types::ports::CoordinatorStore;

#[derive(Default)]
pub struct InMemoryCoordinatorStore {
    sets: DashMap<String, HashSet<String>>,
    lists: DashMap<String, Mutex<VecDeque<String>>>,
}

impl InMemoryCoordinatorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoordinatorStore for InMemoryCoordinatorStore {
    async fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        let mut set = self.sets.entry(key.to_string()).or_default();
        Ok(set.insert(member.to_string()))
    }

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool> {
        Ok(self
            .sets
            .get(key)
            .map(|s| s.contains(member))
            .unwrap_or(false))
    }

    async fn set_len(&self, key: &str) -> Result<u64> {
        Ok(self.sets.get(key).map(|s| s.len() as u64).unwrap_or(0))
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_push_back(&self, key: &str, value: &str) -> Result<()> {
        let list = self
            .lists
            .entry(key.to_string())
            .or_insert_with(|| Mutex::new(VecDeque::new()));
        list.lock().push_back(value.to_string());
        Ok(())
    }

    async fn list_remove_value(&self, key: &str, value: &str) -> Result<bool> {
        let Some(list) = self.lists.get(key) else {
            return Ok(false);
        };
        let mut guard = list.lock();
        if let Some(pos) = guard.iter().position(|v| v == value) {
            guard.remove(pos);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list_range(&self, key: &str, offset: i64, limit: i64) -> Result<Vec<String>> {
        let Some(list) = self.lists.get(key) else {
            return Ok(Vec::new());
        };
        let guard = list.lock();
        let offset = offset.max(0) as usize;
        let take = if limit <= 0 {
            guard.len()
        } else {
            limit as usize
        };
        Ok(guard.iter().skip(offset).take(take).cloned().collect())
    }

    async fn list_len(&self, key: &str) -> Result<u64> {
        Ok(self
            .lists
            .get(key)
            .map(|list| list.lock().len() as u64)
            .unwrap_or(0))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.sets.remove(key);
        self.lists.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_add_reports_novelty() {
        let store = InMemoryCoordinatorStore::new();
        assert!(store.set_add("seen", "a").await.unwrap());
        assert!(!store.set_add("seen", "a").await.unwrap());
        assert_eq!(store.set_len("seen").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_members_reflects_all_adds() {
        let store = InMemoryCoordinatorStore::new();
        store.set_add("seen", "a").await.unwrap();
        store.set_add("seen", "b").await.unwrap();
        let mut members = store.set_members("seen").await.unwrap();
        members.sort();
        assert_eq!(members, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn list_remove_value_removes_first_match_only() {
        let store = InMemoryCoordinatorStore::new();
        store.list_push_back("q", "one").await.unwrap();
        store.list_push_back("q", "two").await.unwrap();
        store.list_push_back("q", "one").await.unwrap();

        assert!(store.list_remove_value("q", "one").await.unwrap());
        assert_eq!(store.list_len("q").await.unwrap(), 2);
        assert_eq!(
            store.list_range("q", 0, -1).await.unwrap(),
            vec!["two".to_string(), "one".to_string()]
        );
        assert!(!store.list_remove_value("q", "missing").await.unwrap());
    }

    #[tokio::test]
    async fn delete_clears_both_kinds() {
        let store = InMemoryCoordinatorStore::new();
        store.set_add("k", "a").await.unwrap();
        store.list_push_back("k", "b").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.set_len("k").await.unwrap(), 0);
        assert_eq!(store.list_len("k").await.unwrap(), 0);
    }
}
