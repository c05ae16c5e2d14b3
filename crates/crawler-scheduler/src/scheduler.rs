//! Worker pool orchestration: owns the crawl lifecycle end to end.
//!
//! Mirrors `riptide-workers::worker::{Worker, WorkerPool}`'s shape — an
//! `AtomicBool` running flag, one `tokio::spawn` per worker, a dedicated
//! stats-reporter task, and `futures::future::join_all` on shutdown — but
//! each worker here drives the fixed frontier -> fetch -> parse -> dedup ->
//! store -> enqueue pipeline from spec.md §4.5 rather than a processor
//! registry, since this crate has exactly one pipeline shape.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crawler_dedup::DuplicateDetector;
use crawler_extract::Parser;
use crawler_fetch::Fetcher;
use crawler_frontier::Frontier;
use crawler_types::content::ParsedContent;
use crawler_types::error::Result;
use crawler_types::ports::ContentStore;
use crawler_types::task::{Priority, UrlTask};

use crate::config::SchedulerConfig;
use crate::stats::{CrawlStats, CrawlStatsSnapshot};

/// Owns the frontier, fetcher, parser, duplicate detector, and content
/// store, and drives the worker pool that pulls them together.
pub struct Scheduler {
    config: SchedulerConfig,
    frontier: Arc<Frontier>,
    fetcher: Arc<Fetcher>,
    parser: Arc<Parser>,
    dedup: Arc<DuplicateDetector>,
    content_store: Arc<dyn ContentStore>,
    stats: Arc<CrawlStats>,
    running: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        frontier: Arc<Frontier>,
        fetcher: Arc<Fetcher>,
        parser: Arc<Parser>,
        dedup: Arc<DuplicateDetector>,
        content_store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            config,
            frontier,
            fetcher,
            parser,
            dedup,
            content_store,
            stats: Arc::new(CrawlStats::new()),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load durable state into the frontier and duplicate detector, then
    /// prepare the content store. Spec.md §4.5 Initialization order:
    /// coordinator handle (owned by the caller), Frontier, Fetcher (no
    /// state to load), Parser (stateless), ContentStore, DuplicateDetector.
    pub async fn initialize(&self) -> Result<()> {
        self.frontier.initialize().await?;
        self.content_store.initialize().await?;
        self.dedup.initialize().await?;
        Ok(())
    }

    pub fn stats(&self) -> CrawlStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Signal every worker and the stats-reporter to stop at their next
    /// check. Does not block; callers await the `start` future (or its
    /// spawned handles) to observe completion.
    pub fn stop(&self) {
        info!("shutdown requested");
        self.running.store(false, Ordering::Relaxed);
    }

    /// Enqueue seeds (if the frontier is empty), launch the worker pool and
    /// the stats reporter, and run until a limit is hit or `stop()` is
    /// called. Returns once every worker has exited.
    pub async fn start(&self, seeds: Vec<String>) -> Result<()> {
        if self.frontier.is_empty() {
            let seed_tasks: Vec<UrlTask> = seeds
                .into_iter()
                .map(|url| UrlTask::new(url, 0, Priority::High))
                .collect();
            let added = self.frontier.add_many(seed_tasks).await;
            info!(added, "seed URLs enqueued");
        }

        self.running.store(true, Ordering::Relaxed);
        let started_at = Instant::now();

        let worker_count = self.config.worker_count();
        info!(worker_count, "starting worker pool");

        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(worker_count + 1);
        for id in 0..worker_count {
            handles.push(self.spawn_worker(id, started_at));
        }
        handles.push(self.spawn_stats_reporter(started_at));

        join_all(handles).await;
        info!(stats = ?self.stats(), "worker pool stopped");
        Ok(())
    }

    fn spawn_worker(&self, worker_id: usize, started_at: Instant) -> JoinHandle<()> {
        let frontier = self.frontier.clone();
        let fetcher = self.fetcher.clone();
        let parser = self.parser.clone();
        let dedup = self.dedup.clone();
        let content_store = self.content_store.clone();
        let stats = self.stats.clone();
        let running = self.running.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            info!(worker_id, "worker started");
            loop {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                if let Some(max_pages) = config.max_pages {
                    if stats.pages_crawled.load(Ordering::Relaxed) >= max_pages {
                        info!(worker_id, max_pages, "page limit reached, stopping");
                        break;
                    }
                }
                if let Some(max_duration) = config.max_duration {
                    if started_at.elapsed() >= max_duration {
                        info!(worker_id, "duration limit reached, stopping");
                        break;
                    }
                }

                match run_one_task(
                    &frontier,
                    &fetcher,
                    &parser,
                    &dedup,
                    content_store.as_ref(),
                    &stats,
                    &config,
                )
                .await
                {
                    TaskOutcome::NoTaskAvailable => {
                        sleep(config.empty_frontier_backoff).await;
                    }
                    TaskOutcome::Handled => {}
                }
            }
            info!(worker_id, "worker stopped");
        })
    }

    fn spawn_stats_reporter(&self, started_at: Instant) -> JoinHandle<()> {
        let stats = self.stats.clone();
        let running = self.running.clone();
        let interval = self.config.stats_interval;
        let frontier = self.frontier.clone();

        tokio::spawn(async move {
            while running.load(Ordering::Relaxed) {
                sleep(interval).await;
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                let snapshot = stats.snapshot();
                let frontier_stats = frontier.stats();
                info!(
                    elapsed_secs = started_at.elapsed().as_secs(),
                    pages_crawled = snapshot.pages_crawled,
                    pages_stored = snapshot.pages_stored,
                    errors = snapshot.errors,
                    duplicates_skipped = snapshot.duplicates_skipped,
                    robots_blocked = snapshot.robots_blocked,
                    total_bytes_downloaded = snapshot.total_bytes_downloaded,
                    avg_response_time_ms = snapshot.avg_response_time_ms,
                    queued = frontier_stats.queued,
                    processed = frontier_stats.processed,
                    hosts = frontier_stats.hosts,
                    "crawl progress"
                );
            }
        })
    }

    /// Flush and release the content store; called once by the caller after
    /// `start` returns, per spec.md §4.5 Shutdown ("close Fetcher,
    /// ContentStore, Frontier, coordinator"). The Fetcher and Frontier hold
    /// no unmanaged resources beyond what `Drop` already releases, so only
    /// the content store needs an explicit close.
    pub async fn close(&self) -> Result<()> {
        self.frontier.cleanup().await;
        self.content_store.close().await
    }
}

enum TaskOutcome {
    NoTaskAvailable,
    Handled,
}

/// One iteration of the worker loop (spec.md §4.5 Worker loop, steps 2-11).
async fn run_one_task(
    frontier: &Frontier,
    fetcher: &Fetcher,
    parser: &Parser,
    dedup: &DuplicateDetector,
    content_store: &dyn ContentStore,
    stats: &CrawlStats,
    config: &SchedulerConfig,
) -> TaskOutcome {
    let task = match frontier.next().await {
        Some(task) => task,
        None => return TaskOutcome::NoTaskAvailable,
    };

    if task.depth > config.max_depth {
        frontier.mark_processed(&task.url).await;
        return TaskOutcome::Handled;
    }

    let fetch_started = Instant::now();
    let result = fetcher.fetch(&task.url).await;
    let fetch_elapsed_ms = fetch_started.elapsed().as_millis() as u64;

    // Worker loop step 4: every fetch attempt counts toward pages_crawled and
    // the response-time average, before the step-5 error check below — an
    // errored or blocked fetch still crawled the URL, it just has nothing to
    // show for it.
    stats.record_crawled(fetch_elapsed_ms);

    if result.status_code == 403 && result.error.as_deref() == Some("Blocked by robots.txt") {
        stats.record_robots_blocked();
    }

    let Some(content) = result.content.clone() else {
        frontier.mark_failed(task, config.retry_attempts).await;
        stats.record_error();
        return TaskOutcome::Handled;
    };

    stats.record_bytes(content.len() as u64);

    let parsed = match parser.parse(&task.url, &content) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(url = %task.url, error = %e, "parse error, nothing to store");
            ParsedContent::empty(&task.url)
        }
    };

    let dup = dedup.check(&parsed);
    if dup.is_duplicate(false) {
        stats.record_duplicate();
        frontier.mark_processed(&task.url).await;
        return TaskOutcome::Handled;
    }

    match content_store.store(&parsed).await {
        Ok(()) => {
            stats.record_stored();
            if let Err(e) = dedup.add(&parsed).await {
                warn!(url = %task.url, error = %e, "duplicate detector add failed");
            }
        }
        Err(e) => {
            warn!(url = %task.url, error = %e, "content store write failed");
            stats.record_error();
        }
    }

    // Children are always enqueued; the depth cutoff is enforced when a
    // task is *dequeued* (step 3 above), not at enqueue time — spec.md §8
    // scenario 5 enqueues the over-depth URL and discards it at `next()`.
    let children: Vec<UrlTask> = parsed
        .links
        .iter()
        .map(|link| task.child(link, Priority::Normal))
        .collect();
    frontier.add_many(children).await;

    frontier.mark_processed(&task.url).await;
    TaskOutcome::Handled
}
