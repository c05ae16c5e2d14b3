//! Politeness-aware priority frontier.
//!
//! Per-host queues and the processed-URL set live in memory for the hot
//! path and are mirrored to the coordinator store for durability; a
//! coordinator failure on `add`/`markProcessed` is logged and swallowed —
//! in-memory state is authoritative for the rest of the run, per the error
//! handling design's coordinator-store-failure semantics.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

use crawler_types::error::Result;
use crawler_types::ports::CoordinatorStore;
use crawler_types::task::UrlTask;

use crate::config::FrontierConfig;
use crate::host::origin_of;

const PROCESSED_SET_KEY: &str = "crawler:frontier:processed";
const KNOWN_HOSTS_KEY: &str = "crawler:frontier:hosts";

fn queue_key(host: &str) -> String {
    format!("crawler:frontier:queue:{host}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierStats {
    pub queued: u64,
    pub processed: u64,
    pub hosts: u64,
}

/// Everything the ready-host selection and mutation need, behind one lock —
/// per spec.md §9's design note that "a single mutex covering these
/// structures is sufficient given `next()`'s bounded work". Splitting these
/// across separate mutexes let a second worker mutate a host's queue between
/// `next()`'s select and remove steps, undermining the "globally highest
/// priority" selection guarantee under concurrency.
#[derive(Default)]
struct FrontierState {
    queues: HashMap<String, VecDeque<UrlTask>>,
    last_access: HashMap<String, Instant>,
    processed: HashSet<String>,
    queued_urls: HashSet<String>,
}

pub struct Frontier {
    config: FrontierConfig,
    coordinator: Arc<dyn CoordinatorStore>,
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub fn new(coordinator: Arc<dyn CoordinatorStore>, config: FrontierConfig) -> Self {
        Self {
            config,
            coordinator,
            state: Mutex::new(FrontierState::default()),
        }
    }

    /// Load the processed set and all known host queues from durable
    /// storage into memory. Called once during scheduler startup.
    pub async fn initialize(&self) -> Result<()> {
        let processed = self.coordinator.set_members(PROCESSED_SET_KEY).await?;
        let hosts = self.coordinator.set_members(KNOWN_HOSTS_KEY).await?;

        let mut loaded_queues = HashMap::with_capacity(hosts.len());
        let mut loaded_queued_urls = HashSet::new();
        for host in hosts {
            let serialized = self.coordinator.list_range(&queue_key(&host), 0, -1).await?;
            let mut queue = VecDeque::with_capacity(serialized.len());
            for raw in serialized {
                match serde_json::from_str::<UrlTask>(&raw) {
                    Ok(task) => {
                        loaded_queued_urls.insert(task.url.clone());
                        queue.push_back(task);
                    }
                    Err(e) => warn!(host = %host, error = %e, "dropping unparseable durable frontier entry"),
                }
            }
            if !queue.is_empty() {
                loaded_queues.insert(host, queue);
            }
        }

        let mut state = self.state.lock();
        state.processed = processed.into_iter().collect();
        state.queues = loaded_queues;
        state.queued_urls = loaded_queued_urls;
        Ok(())
    }

    /// Append `task` to its host's queue unless `task.url` has already been
    /// processed. Returns whether it was enqueued.
    pub async fn add(&self, task: UrlTask) -> bool {
        let Some(host) = origin_of(&task.url) else {
            warn!(url = %task.url, "frontier.add given a task with no parseable origin");
            return false;
        };

        {
            let state = self.state.lock();
            if state.processed.contains(&task.url) {
                return false;
            }
            if self.config.dedupe_queue && state.queued_urls.contains(&task.url) {
                return false;
            }
        }

        let serialized = match serde_json::to_string(&task) {
            Ok(s) => s,
            Err(e) => {
                warn!(url = %task.url, error = %e, "failed to serialize task for durable frontier");
                String::new()
            }
        };

        {
            let mut state = self.state.lock();
            state.queued_urls.insert(task.url.clone());
            state.queues.entry(host.clone()).or_default().push_back(task);
        }

        if !serialized.is_empty() {
            if let Err(e) = self.coordinator.set_add(KNOWN_HOSTS_KEY, &host).await {
                warn!(host = %host, error = %e, "coordinator set_add for known hosts failed (in-memory state unaffected)");
            }
            if let Err(e) = self.coordinator.list_push_back(&queue_key(&host), &serialized).await {
                warn!(host = %host, error = %e, "coordinator list_push_back failed (in-memory state unaffected)");
            }
        }

        true
    }

    /// `add` each task in turn; returns the number actually enqueued.
    pub async fn add_many(&self, tasks: Vec<UrlTask>) -> usize {
        let mut added = 0;
        for task in tasks {
            if self.add(task).await {
                added += 1;
            }
        }
        added
    }

    /// Select and remove the highest-priority task from the highest-priority
    /// ready host, tie-breaking on longest idle time. Returns `None` if no
    /// host is both ready (politeness cooldown elapsed) and non-empty.
    ///
    /// Selection and removal happen under one held lock so a concurrent
    /// `next()` (or `add`) on another worker can't change which task
    /// `task_index` refers to between the two steps.
    pub async fn next(&self) -> Option<UrlTask> {
        let now = Instant::now();
        let delay = self.config.politeness_delay;

        let (host, task) = {
            let mut state = self.state.lock();
            let (host, task_index) =
                Self::select_ready_task(&state.queues, &state.last_access, now, delay)?;

            let queue = state.queues.get_mut(&host)?;
            let task = queue.remove(task_index)?;
            if queue.is_empty() {
                state.queues.remove(&host);
            }
            state.last_access.insert(host.clone(), now);
            state.queued_urls.remove(&task.url);
            (host, task)
        };

        if let Ok(serialized) = serde_json::to_string(&task) {
            if let Err(e) = self
                .coordinator
                .list_remove_value(&queue_key(&host), &serialized)
                .await
            {
                warn!(host = %host, error = %e, "coordinator list_remove_value failed (in-memory state unaffected)");
            }
        }

        Some(task)
    }

    fn select_ready_task(
        queues: &HashMap<String, VecDeque<UrlTask>>,
        last_access: &HashMap<String, Instant>,
        now: Instant,
        delay: Duration,
    ) -> Option<(String, usize)> {
        let mut best: Option<(String, usize, crawler_types::task::Priority, Duration)> = None;

        for (host, queue) in queues.iter() {
            if queue.is_empty() {
                continue;
            }
            let idle = match last_access.get(host) {
                Some(&last) => now.saturating_duration_since(last),
                None => Duration::MAX,
            };
            if idle < delay {
                continue;
            }

            let mut max_index = 0;
            let mut max_priority = queue[0].priority;
            for (i, task) in queue.iter().enumerate().skip(1) {
                if task.priority > max_priority {
                    max_priority = task.priority;
                    max_index = i;
                }
            }

            let is_better = match &best {
                None => true,
                Some((_, _, best_priority, best_idle)) => {
                    max_priority > *best_priority
                        || (max_priority == *best_priority && idle > *best_idle)
                }
            };
            if is_better {
                best = Some((host.clone(), max_index, max_priority, idle));
            }
        }

        best.map(|(host, index, _, _)| (host, index))
    }

    /// Add `url` to the processed set (memory + durable).
    pub async fn mark_processed(&self, url: &str) {
        self.state.lock().processed.insert(url.to_string());
        if let Err(e) = self.coordinator.set_add(PROCESSED_SET_KEY, url).await {
            warn!(url = %url, error = %e, "coordinator set_add for processed set failed (in-memory state unaffected)");
        }
    }

    /// If `task.retry_count < max_retries`, re-add a demoted/incremented
    /// copy and return `true`. Otherwise mark processed (to prevent
    /// ping-pong) and return `false`.
    pub async fn mark_failed(&self, task: UrlTask, max_retries: u32) -> bool {
        if task.retry_count < max_retries {
            let retried = task.retried();
            self.add(retried).await
        } else {
            self.mark_processed(&task.url).await;
            false
        }
    }

    pub fn stats(&self) -> FrontierStats {
        let state = self.state.lock();
        FrontierStats {
            queued: state.queues.values().map(|q| q.len() as u64).sum(),
            processed: state.processed.len() as u64,
            hosts: state.queues.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queues.values().all(|q| q.is_empty())
    }

    /// Drop empty host queues from memory and durable storage.
    pub async fn cleanup(&self) {
        let empty_hosts: Vec<String> = {
            let mut state = self.state.lock();
            let empty: Vec<String> = state
                .queues
                .iter()
                .filter(|(_, q)| q.is_empty())
                .map(|(h, _)| h.clone())
                .collect();
            for host in &empty {
                state.queues.remove(host);
            }
            empty
        };

        for host in empty_hosts {
            if let Err(e) = self.coordinator.delete(&queue_key(&host)).await {
                warn!(host = %host, error = %e, "coordinator delete for drained queue failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler_coordinator::InMemoryCoordinatorStore;
    use crawler_types::task::Priority;

    fn frontier(delay_secs: f64) -> Frontier {
        Frontier::new(
            Arc::new(InMemoryCoordinatorStore::new()),
            FrontierConfig {
                politeness_delay: Duration::from_secs_f64(delay_secs),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn processed_url_cannot_be_readded() {
        let frontier = frontier(0.0);
        frontier.mark_processed("https://a.example/").await;
        let added = frontier
            .add(UrlTask::new("https://a.example/", 0, Priority::Normal))
            .await;
        assert!(!added);
    }

    #[tokio::test]
    async fn first_next_call_is_immediately_ready() {
        let frontier = frontier(100.0);
        frontier
            .add(UrlTask::new("https://a.example/", 0, Priority::Normal))
            .await;
        assert!(frontier.next().await.is_some());
    }

    #[tokio::test]
    async fn second_host_visit_waits_out_politeness_delay() {
        let frontier = frontier(0.05);
        frontier
            .add(UrlTask::new("https://a.example/1", 0, Priority::Normal))
            .await;
        frontier
            .add(UrlTask::new("https://a.example/2", 0, Priority::Normal))
            .await;

        let first = frontier.next().await.unwrap();
        assert_eq!(first.url, "https://a.example/1");
        // Immediately after: same host is not yet ready.
        assert!(frontier.next().await.is_none());

        tokio::time::sleep(Duration::from_millis(60)).await;
        let second = frontier.next().await.unwrap();
        assert_eq!(second.url, "https://a.example/2");
    }

    #[tokio::test]
    async fn highest_priority_wins_among_ready_hosts() {
        let frontier = frontier(0.0);
        frontier
            .add(UrlTask::new("https://low.example/", 0, Priority::Low))
            .await;
        frontier
            .add(UrlTask::new("https://crit.example/", 0, Priority::Critical))
            .await;

        let next = frontier.next().await.unwrap();
        assert_eq!(next.url, "https://crit.example/");
    }

    #[tokio::test]
    async fn mark_failed_retries_with_demoted_priority_until_exhausted() {
        let frontier = frontier(0.0);
        let task = UrlTask::new("https://a.example/", 0, Priority::High);

        let retried = frontier.mark_failed(task.clone(), 2).await;
        assert!(retried);

        let requeued = frontier.next().await.unwrap();
        assert_eq!(requeued.retry_count, 1);
        assert_eq!(requeued.priority, Priority::Low);

        let retried_again = frontier.mark_failed(requeued, 2).await;
        assert!(retried_again);
        let requeued_again = frontier.next().await.unwrap();

        let exhausted = frontier.mark_failed(requeued_again, 2).await;
        assert!(!exhausted, "third failure exceeds max_retries=2 and should stop retrying");
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn stats_report_queue_and_processed_counts() {
        let frontier = frontier(0.0);
        frontier
            .add(UrlTask::new("https://a.example/", 0, Priority::Normal))
            .await;
        frontier.mark_processed("https://b.example/").await;

        let stats = frontier.stats();
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.hosts, 1);
    }

    #[tokio::test]
    async fn concurrent_next_calls_never_hand_out_the_same_task_twice() {
        let frontier = Arc::new(frontier(0.0));
        frontier
            .add(UrlTask::new("https://a.example/1", 0, Priority::Normal))
            .await;
        frontier
            .add(UrlTask::new("https://a.example/2", 0, Priority::Normal))
            .await;

        let (first, second) = tokio::join!(frontier.next(), frontier.next());
        let mut urls = vec![first.unwrap().url, second.unwrap().url];
        urls.sort();
        assert_eq!(urls, vec!["https://a.example/1", "https://a.example/2"]);
    }

    #[tokio::test]
    async fn cleanup_drops_empty_host_queues() {
        let frontier = frontier(0.0);
        frontier
            .add(UrlTask::new("https://a.example/", 0, Priority::Normal))
            .await;
        frontier.next().await;
        assert_eq!(frontier.stats().hosts, 0, "queue removed as soon as it empties in next()");
        frontier.cleanup().await;
    }
}
