//! Per-origin robots.txt cache and matcher, grounded on
//! `riptide_core::robots::RobotsManager`'s cache/fetch shape, minus its
//! token-bucket rate limiter: politeness pacing here is the Frontier's job,
//! not the Fetcher's.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use tracing::{debug, warn};

const ROBOTS_CACHE_TTL: Duration = Duration::from_secs(3600);
const ROBOTS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct CachedRobots {
    content: String,
    cached_at: Instant,
}

impl CachedRobots {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > ROBOTS_CACHE_TTL
    }
}

fn origin_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}

pub struct RobotsChecker {
    client: Client,
    cache: DashMap<String, CachedRobots>,
}

impl RobotsChecker {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(ROBOTS_FETCH_TIMEOUT)
            .build()
            .expect("robots.txt client builds with no custom TLS/proxy config");
        Self {
            client,
            cache: DashMap::new(),
        }
    }

    /// Whether `user_agent` may fetch `url` per the origin's robots.txt.
    /// A fetch failure or non-200 status is treated as "allow all" rather
    /// than blocking the crawl on an unreachable robots.txt.
    pub async fn can_fetch(&self, url: &str, user_agent: &str) -> bool {
        let Some(origin) = origin_of(url) else {
            return true;
        };

        let content = self.robots_content_for(&origin).await;
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&content, user_agent, url)
    }

    async fn robots_content_for(&self, origin: &str) -> String {
        if let Some(cached) = self.cache.get(origin) {
            if !cached.is_expired() {
                return cached.content.clone();
            }
        }

        let robots_url = format!("{origin}/robots.txt");
        let content = match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => {
                response.text().await.unwrap_or_default()
            }
            Ok(response) => {
                debug!(origin = %origin, status = %response.status(), "robots.txt not available, allowing all");
                String::new()
            }
            Err(e) => {
                warn!(origin = %origin, error = %e, "failed to fetch robots.txt, allowing all");
                String::new()
            }
        };

        self.cache.insert(
            origin.to_string(),
            CachedRobots {
                content: content.clone(),
                cached_at: Instant::now(),
            },
        );
        content
    }
}

impl Default for RobotsChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn disallowed_path_is_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
            .mount(&server)
            .await;

        let checker = RobotsChecker::new();
        let url = format!("{}/private/page", server.uri());
        assert!(!checker.can_fetch(&url, "TestBot").await);

        let allowed_url = format!("{}/public/page", server.uri());
        assert!(checker.can_fetch(&allowed_url, "TestBot").await);
    }

    #[tokio::test]
    async fn missing_robots_txt_allows_everything() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let checker = RobotsChecker::new();
        let url = format!("{}/anything", server.uri());
        assert!(checker.can_fetch(&url, "TestBot").await);
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /blocked\n"))
            .expect(1)
            .mount(&server)
            .await;

        let checker = RobotsChecker::new();
        let url = format!("{}/blocked/a", server.uri());
        let url2 = format!("{}/blocked/b", server.uri());
        assert!(!checker.can_fetch(&url, "TestBot").await);
        assert!(!checker.can_fetch(&url2, "TestBot").await);
    }
}
