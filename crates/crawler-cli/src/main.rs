//! Process entrypoint for the polite web crawler.
//!
//! Thin by design, the way `riptide-workers::main` is thin: parse args,
//! load config, wire components, run the scheduler, wait for a shutdown
//! signal or a natural stop, close resources.

mod config;
mod error;
mod signals;
mod wiring;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use error::ExitCode;

#[derive(Parser)]
#[command(name = "crawler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Distributed, polite web crawler", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Override `crawler.max_pages` from the config file.
    #[arg(long)]
    max_pages: Option<u64>,

    /// Override `crawler.max_duration` (seconds) from the config file.
    #[arg(long)]
    max_duration: Option<u64>,

    /// Test the coordinator, content store, and a single fetch of the
    /// first seed URL without enqueueing a crawl.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    std::process::exit(match run().await {
        Ok(()) => ExitCode::Success.as_i32(),
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            ExitCode::FatalError.as_i32()
        }
    });
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let app_config = config::load(&cli.config)?;

    if cli.dry_run {
        return run_dry_run(&app_config).await;
    }

    let components = std::sync::Arc::new(wiring::build(&app_config, cli.max_pages, cli.max_duration).await?);
    components.scheduler.initialize().await?;

    let seeds = app_config.crawler.seed_urls.clone();
    let mut run_handle = {
        let components = components.clone();
        tokio::spawn(async move { components.scheduler.start(seeds).await })
    };

    tokio::select! {
        result = &mut run_handle => {
            result??;
        }
        _ = signals::wait_for_shutdown() => {
            // Signal every worker to stop at its next check, then wait for
            // them to actually exit before closing downstream resources —
            // spec.md §5's "scheduler waits for all workers to acknowledge
            // cancellation before closing downstream resources".
            components.scheduler.stop();
            run_handle.await??;
        }
    }

    components.scheduler.close().await?;
    tracing::info!(stats = ?components.scheduler.stats(), "crawl finished");
    Ok(())
}

async fn run_dry_run(app_config: &crawler_types::config::AppConfig) -> Result<()> {
    tracing::info!("dry-run: probing coordinator, content store, and first seed fetch");

    let components = wiring::build(app_config, None, None).await?;
    components.content_store.initialize().await?;
    tracing::info!("content store initialized successfully");

    let Some(first_seed) = app_config.crawler.seed_urls.first() else {
        bail!("dry-run requires at least one configured crawler.seed_urls entry");
    };

    let fetcher = crawler_fetch::Fetcher::new(crawler_fetch::FetcherConfig {
        max_concurrent_requests: 1,
        request_timeout: std::time::Duration::from_secs(app_config.crawler.request_timeout),
        user_agent: app_config.crawler.user_agent.clone(),
        respect_robots_txt: app_config.crawler.respect_robots_txt,
        max_connections_per_host: 1,
    });
    let result = fetcher.fetch(first_seed).await;
    tracing::info!(
        url = %result.url,
        status = result.status_code,
        error = ?result.error,
        "dry-run fetch complete"
    );

    Ok(())
}
