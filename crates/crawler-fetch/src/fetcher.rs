//! Bounded-concurrency HTTP fetcher with robots.txt compliance, content-type
//! filtering, size-bounded streaming, and safe charset decoding.

use std::sync::Arc;

use futures::StreamExt;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crawler_types::fetch::FetchResult;

use crate::charset::{decode, extract_charset};
use crate::config::FetcherConfig;
use crate::robots::RobotsChecker;
use crate::stats::{FetchStats, FetchStatsSnapshot};

const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "text/html",
    "text/plain",
    "text/xml",
    "application/xml",
    "application/xhtml+xml",
    "application/json",
    "application/ld+json",
];

const CHUNK_TARGET: usize = 8 * 1024;
const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

pub struct Fetcher {
    client: Client,
    semaphore: Arc<Semaphore>,
    robots: Option<RobotsChecker>,
    config: FetcherConfig,
    stats: FetchStats,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .brotli(true)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .build()
            .expect("reqwest client builds with a static user agent and no custom TLS config");

        let robots = config.respect_robots_txt.then(RobotsChecker::new);

        Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            robots,
            config,
            stats: FetchStats::default(),
        }
    }

    pub fn stats(&self) -> FetchStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn fetch(&self, url: &str) -> FetchResult {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("fetcher semaphore is never closed");

        self.stats.record_attempt();

        if let Some(robots) = &self.robots {
            if !robots.can_fetch(url, &self.config.user_agent).await {
                debug!(url = %url, "blocked by robots.txt");
                self.stats.record_robots_blocked();
                return FetchResult::robots_blocked(url);
            }
        }

        let started = std::time::Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "transport error");
                self.stats.record_failure();
                return FetchResult::transport_error(url, e.to_string());
            }
        };

        let status_code = response.status().as_u16();
        let headers: std::collections::HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let content_type = headers.get("content-type").cloned();
        if !self.is_allowed_content_type(content_type.as_deref()) {
            debug!(url = %url, content_type = ?content_type, "rejecting non-text content type");
            return FetchResult {
                url: url.to_string(),
                status_code,
                content: None,
                headers: Some(headers),
                content_type,
                encoding: None,
                fetch_time: started.elapsed().as_secs_f64(),
                error: Some("Non-text content type".to_string()),
            };
        }

        if let Some(len) = headers.get("content-length").and_then(|v| v.parse::<u64>().ok()) {
            if len > MAX_BODY_BYTES {
                debug!(url = %url, content_length = len, "content-length exceeds cap, aborting before read");
                return FetchResult {
                    url: url.to_string(),
                    status_code,
                    content: None,
                    headers: Some(headers),
                    content_type,
                    encoding: None,
                    fetch_time: started.elapsed().as_secs_f64(),
                    error: Some("Content too large".to_string()),
                };
            }
        }

        if !response.status().is_success() {
            // Non-2xx with an acceptable content-type: still read the body
            // (useful error pages), but this is a final outcome, not a
            // transport failure.
            let body = Self::read_bounded(response).await;
            return self.finish_body_result(url, status_code, headers, content_type, body, started);
        }

        let body = Self::read_bounded(response).await;
        self.finish_body_result(url, status_code, headers, content_type, body, started)
    }

    fn finish_body_result(
        &self,
        url: &str,
        status_code: u16,
        headers: std::collections::HashMap<String, String>,
        content_type: Option<String>,
        body: Option<Vec<u8>>,
        started: std::time::Instant,
    ) -> FetchResult {
        let Some(bytes) = body else {
            return FetchResult {
                url: url.to_string(),
                status_code,
                content: None,
                headers: Some(headers),
                content_type,
                encoding: None,
                fetch_time: started.elapsed().as_secs_f64(),
                error: Some("Content exceeded size limit".to_string()),
            };
        };

        let declared = content_type.as_deref().and_then(extract_charset);
        let (text, encoding) = decode(&bytes, declared.as_deref());
        self.stats.record_success(bytes.len() as u64);

        FetchResult {
            url: url.to_string(),
            status_code,
            content: Some(text),
            headers: Some(headers),
            content_type,
            encoding: Some(encoding),
            fetch_time: started.elapsed().as_secs_f64(),
            error: None,
        }
    }

    /// Stream the body in roughly `CHUNK_TARGET`-sized increments, aborting
    /// once cumulative size exceeds `MAX_BODY_BYTES`. Returns `None` if the
    /// cap was exceeded.
    async fn read_bounded(response: reqwest::Response) -> Option<Vec<u8>> {
        let mut buffer = Vec::with_capacity(CHUNK_TARGET);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(_) => return None,
            };
            buffer.extend_from_slice(&chunk);
            if buffer.len() as u64 > MAX_BODY_BYTES {
                return None;
            }
        }

        Some(buffer)
    }

    fn is_allowed_content_type(&self, content_type: Option<&str>) -> bool {
        let Some(content_type) = content_type else {
            return false;
        };
        let base = content_type.split(';').next().unwrap_or("").trim();
        ALLOWED_CONTENT_TYPES.contains(&base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_without_robots() -> Fetcher {
        Fetcher::new(FetcherConfig {
            respect_robots_txt: false,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn successful_html_fetch_is_decoded_and_counted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>").insert_header("content-type", "text/html; charset=utf-8"))
            .mount(&server)
            .await;

        let fetcher = fetcher_without_robots();
        let result = fetcher.fetch(&format!("{}/page", server.uri())).await;

        assert_eq!(result.status_code, 200);
        assert_eq!(result.content.as_deref(), Some("<html>hi</html>"));
        assert!(result.has_usable_content());
        assert_eq!(fetcher.stats().successful_requests, 1);
    }

    #[tokio::test]
    async fn non_text_content_type_is_rejected_without_reading_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/image"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 10]).insert_header("content-type", "image/png"))
            .mount(&server)
            .await;

        let fetcher = fetcher_without_robots();
        let result = fetcher.fetch(&format!("{}/image", server.uri())).await;

        assert_eq!(result.error.as_deref(), Some("Non-text content type"));
        assert!(result.content.is_none());
    }

    #[tokio::test]
    async fn oversize_content_length_header_aborts_before_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/huge"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .insert_header("content-length", "99999999999"),
            )
            .mount(&server)
            .await;

        let fetcher = fetcher_without_robots();
        let result = fetcher.fetch(&format!("{}/huge", server.uri())).await;

        assert_eq!(result.error.as_deref(), Some("Content too large"));
    }

    #[tokio::test]
    async fn transport_error_against_unreachable_host_is_a_status_zero_result() {
        let fetcher = fetcher_without_robots();
        let result = fetcher.fetch("http://127.0.0.1:1/unreachable").await;
        assert_eq!(result.status_code, 0);
        assert!(result.error.is_some());
        assert_eq!(fetcher.stats().failed_requests, 1);
    }
}
