//! HTTP fetcher: bounded concurrency, robots.txt compliance, content-type
//! filtering, size-bounded streaming, and safe charset decoding.

mod charset;
mod config;
mod fetcher;
mod robots;
mod stats;

pub use config::FetcherConfig;
pub use fetcher::Fetcher;
pub use robots::RobotsChecker;
pub use stats::{FetchStats, FetchStatsSnapshot};
