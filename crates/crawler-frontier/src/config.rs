use std::time::Duration;

/// Frontier tuning knobs, decoupled from `crawler_types::config::CrawlerSection`
/// so the frontier crate has no dependency on the top-level YAML schema.
#[derive(Debug, Clone)]
pub struct FrontierConfig {
    pub politeness_delay: Duration,
    pub max_retries: u32,
    /// Optional in-queue membership index to skip re-enqueueing a URL that
    /// is already waiting in some host's queue. Off by default: the spec's
    /// processed-set check is sufficient correctness-wise, and most crawls
    /// never see enough duplicate parent links for this to matter — see
    /// the design note on URL dedup and re-queueing.
    pub dedupe_queue: bool,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            politeness_delay: Duration::from_secs_f64(1.0),
            max_retries: 3,
            dedupe_queue: false,
        }
    }
}
