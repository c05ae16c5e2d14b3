//! Builds the concrete component graph from a loaded `AppConfig`: coordinator
//! store, content store, frontier, fetcher, parser, duplicate detector, and
//! scheduler, each behind the port its crate expects.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crawler_coordinator::{RedisCoordinatorStore, RedisCoordinatorStoreConfig};
use crawler_dedup::DuplicateDetector;
use crawler_extract::Parser;
use crawler_fetch::{Fetcher, FetcherConfig};
use crawler_frontier::{Frontier, FrontierConfig};
use crawler_scheduler::{Scheduler, SchedulerConfig};
use crawler_store::{FileContentStore, ScyllaContentStore, ScyllaContentStoreConfig};
use crawler_types::config::AppConfig;
use crawler_types::ports::{ContentStore, CoordinatorStore};

/// Everything `main` needs to run a crawl or a `--dry-run` probe.
pub struct Components {
    pub coordinator: Arc<dyn CoordinatorStore>,
    pub content_store: Arc<dyn ContentStore>,
    pub scheduler: Scheduler,
}

pub async fn build(config: &AppConfig, max_pages: Option<u64>, max_duration: Option<u64>) -> Result<Components> {
    let coordinator: Arc<dyn CoordinatorStore> = Arc::new(
        RedisCoordinatorStore::connect(RedisCoordinatorStoreConfig {
            url: config.redis.connection_url(),
            namespace: "crawler".to_string(),
        })
        .await?,
    );
    coordinator.ping().await?;

    let content_store: Arc<dyn ContentStore> = match config.database.kind.as_str() {
        "file" => Arc::new(FileContentStore::new(&config.database.file.data_directory)),
        "cassandra" => {
            let hosts: Vec<String> = config
                .database
                .cassandra
                .hosts
                .iter()
                .map(|host| format!("{host}:{}", config.database.cassandra.port))
                .collect();
            Arc::new(
                ScyllaContentStore::connect(ScyllaContentStoreConfig {
                    hosts,
                    keyspace: config.database.cassandra.keyspace.clone(),
                    replication_factor: config.database.cassandra.replication_factor,
                })
                .await?,
            )
        }
        other => bail!("unknown database.type: {other}"),
    };

    let frontier = Arc::new(Frontier::new(
        coordinator.clone(),
        FrontierConfig {
            politeness_delay: Duration::from_secs_f64(config.crawler.politeness_delay),
            max_retries: config.crawler.retry_attempts,
            dedupe_queue: false,
        },
    ));

    let fetcher = Arc::new(Fetcher::new(FetcherConfig {
        max_concurrent_requests: config.crawler.max_concurrent_requests,
        request_timeout: Duration::from_secs(config.crawler.request_timeout),
        user_agent: config.crawler.user_agent.clone(),
        respect_robots_txt: config.crawler.respect_robots_txt,
        max_connections_per_host: 10,
    }));

    let parser = Arc::new(Parser::new(
        config.crawler.allowed_domains.clone(),
        config.crawler.blocked_domains.clone(),
    ));

    let dedup = Arc::new(DuplicateDetector::new(coordinator.clone()));

    let scheduler = Scheduler::new(
        SchedulerConfig {
            max_concurrent_requests: config.crawler.max_concurrent_requests,
            max_depth: config.crawler.max_depth,
            max_pages: max_pages.or(config.crawler.max_pages),
            max_duration: max_duration
                .or(config.crawler.max_duration)
                .map(Duration::from_secs),
            retry_attempts: config.crawler.retry_attempts,
            ..Default::default()
        },
        frontier,
        fetcher,
        parser,
        dedup,
        content_store.clone(),
    );

    Ok(Components {
        coordinator,
        content_store,
        scheduler,
    })
}
