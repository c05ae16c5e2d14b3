use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub max_concurrent_requests: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub respect_robots_txt: bool,
    /// Per-host connection pool cap. Total pool capacity is
    /// `2 * max_concurrent_requests`, matching the in-flight request gate
    /// with headroom for keep-alive connections winding down.
    pub max_connections_per_host: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            request_timeout: Duration::from_secs(30),
            user_agent: "PoliteCrawler/1.0".to_string(),
            respect_robots_txt: true,
            max_connections_per_host: 10,
        }
    }
}
