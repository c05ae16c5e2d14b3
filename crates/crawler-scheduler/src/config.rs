use std::time::Duration;

/// Scheduler tuning knobs, decoupled from `crawler_types::config::CrawlerSection`
/// so this crate has no dependency on the top-level YAML schema.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Worker pool size is `min(max_concurrent_requests, 10)` per spec.md §4.5.
    pub max_concurrent_requests: usize,
    pub max_depth: u32,
    pub max_pages: Option<u64>,
    pub max_duration: Option<Duration>,
    pub retry_attempts: u32,
    /// How often the stats-reporter task logs a progress line.
    pub stats_interval: Duration,
    /// How long a worker sleeps after an empty `Frontier::next()`.
    pub empty_frontier_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            max_depth: 3,
            max_pages: None,
            max_duration: None,
            retry_attempts: 3,
            stats_interval: Duration::from_secs(30),
            empty_frontier_backoff: Duration::from_secs(1),
        }
    }
}

impl SchedulerConfig {
    /// Worker pool size, per spec.md §4.5 Start: `N = min(max_concurrent_requests, 10)`.
    pub fn worker_count(&self) -> usize {
        self.max_concurrent_requests.min(10).max(1)
    }
}
