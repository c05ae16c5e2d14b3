//! The YAML configuration schema recognized by the crawler (spec.md §6).
//!
//! This is the shape the CLI's config loader deserializes into; each
//! top-level section mirrors a component's own config struct so this type
//! can be decomposed and handed to the component that owns it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawler: CrawlerSection,
    pub database: DatabaseSection,
    pub redis: RedisSection,
    pub logging: LoggingSection,
    pub monitoring: MonitoringSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crawler: CrawlerSection::default(),
            database: DatabaseSection::default(),
            redis: RedisSection::default(),
            logging: LoggingSection::default(),
            monitoring: MonitoringSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSection {
    pub seed_urls: Vec<String>,
    pub max_depth: u32,
    pub politeness_delay: f64,
    pub max_concurrent_requests: usize,
    pub request_timeout: u64,
    pub retry_attempts: u32,
    pub user_agent: String,
    pub respect_robots_txt: bool,
    pub allowed_domains: Vec<String>,
    pub blocked_domains: Vec<String>,
    pub max_pages: Option<u64>,
    pub max_duration: Option<u64>,
}

impl Default for CrawlerSection {
    fn default() -> Self {
        Self {
            seed_urls: Vec::new(),
            max_depth: 3,
            politeness_delay: 1.0,
            max_concurrent_requests: 10,
            request_timeout: 30,
            retry_attempts: 3,
            user_agent: "PoliteCrawler/1.0".to_string(),
            respect_robots_txt: true,
            allowed_domains: Vec::new(),
            blocked_domains: Vec::new(),
            max_pages: None,
            max_duration: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// "file" | "cassandra"
    #[serde(rename = "type")]
    pub kind: String,
    pub file: FileDatabaseSection,
    pub cassandra: CassandraDatabaseSection,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            kind: "file".to_string(),
            file: FileDatabaseSection::default(),
            cassandra: CassandraDatabaseSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatabaseSection {
    pub data_directory: String,
}

impl Default for FileDatabaseSection {
    fn default() -> Self {
        Self {
            data_directory: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CassandraDatabaseSection {
    pub hosts: Vec<String>,
    pub port: u16,
    pub keyspace: String,
    pub replication_factor: u32,
}

impl Default for CassandraDatabaseSection {
    fn default() -> Self {
        Self {
            hosts: vec!["127.0.0.1".to_string()],
            port: 9042,
            keyspace: "crawler".to_string(),
            replication_factor: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSection {
    pub host: String,
    pub port: u16,
    pub db: u32,
    pub password: Option<String>,
}

impl Default for RedisSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
            password: None,
        }
    }
}

impl RedisSection {
    pub fn connection_url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{password}@{host}:{port}/{db}",
                password = password,
                host = self.host,
                port = self.port,
                db = self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub file: String,
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "logs/crawler.log".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSection {
    pub prometheus_port: u16,
    pub metrics_enabled: bool,
}

impl Default for MonitoringSection {
    fn default() -> Self {
        Self {
            prometheus_port: 9090,
            metrics_enabled: false,
        }
    }
}
