//! The unit of work the Frontier hands to workers.

use serde::{Deserialize, Serialize};

/// Crawl priority. Higher numeric value wins ties in the Frontier's
/// selection algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Priority {
    Low = 1,
    Normal = 2,
    High = 3,
    Critical = 4,
}

impl Priority {
    /// Numeric ordering value, used by the Frontier's tie-break logic.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Demote one step towards `Low`, used when a task is retried.
    pub fn demote_to_low(self) -> Self {
        Priority::Low
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// A URL discovered by the crawler, queued in the Frontier until a worker
/// fetches it.
///
/// Immutable except for `retry_count` and `priority`, both of which only
/// ever move in the "retry" direction (count up, priority down).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTask {
    pub url: String,
    pub depth: u32,
    pub priority: Priority,
    pub parent_url: Option<String>,
    /// Seconds since the Unix epoch.
    pub discovered_time: i64,
    pub retry_count: u32,
}

impl UrlTask {
    /// Construct a fresh (never-retried) task.
    pub fn new(url: impl Into<String>, depth: u32, priority: Priority) -> Self {
        Self {
            url: url.into(),
            depth,
            priority,
            parent_url: None,
            discovered_time: chrono::Utc::now().timestamp(),
            retry_count: 0,
        }
    }

    pub fn with_parent(mut self, parent_url: impl Into<String>) -> Self {
        self.parent_url = Some(parent_url.into());
        self
    }

    /// Seed tasks enter at depth 0 with HIGH priority so they bypass
    /// whatever backlog has accumulated from a prior run.
    pub fn seed(url: impl Into<String>) -> Self {
        Self::new(url, 0, Priority::High)
    }

    /// Child task discovered while processing `self`; depth increases
    /// monotonically along the enqueue chain.
    pub fn child(&self, url: impl Into<String>, priority: Priority) -> Self {
        Self::new(url, self.depth + 1, priority).with_parent(self.url.clone())
    }

    /// Produce the retried form of this task: bumped retry count, demoted
    /// priority. Does not mutate `self`.
    pub fn retried(&self) -> Self {
        let mut next = self.clone();
        next.retry_count += 1;
        next.priority = self.priority.demote_to_low();
        next.discovered_time = chrono::Utc::now().timestamp();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn child_depth_increases_monotonically() {
        let parent = UrlTask::new("https://a.example/", 3, Priority::Normal);
        let child = parent.child("https://a.example/x", Priority::Normal);
        assert_eq!(child.depth, parent.depth + 1);
        assert_eq!(child.parent_url.as_deref(), Some("https://a.example/"));
    }

    #[test]
    fn retried_task_is_demoted_and_counted() {
        let task = UrlTask::new("https://a.example/", 0, Priority::High);
        let retried = task.retried();
        assert_eq!(retried.retry_count, 1);
        assert_eq!(retried.priority, Priority::Low);
        assert_eq!(task.retry_count, 0, "retried() must not mutate self");
    }

    #[test]
    fn round_trips_through_json() {
        let task = UrlTask::new("https://a.example/x", 1, Priority::Critical).with_parent("https://a.example/");
        let json = serde_json::to_string(&task).unwrap();
        let back: UrlTask = serde_json::from_str(&json).unwrap();
        assert_eq!(task, back);
    }
}
