//! YAML config loading (spec.md §6) with an environment-variable override
//! for the Redis password, the way `riptide-config::env` layers secrets on
//! top of a file-loaded config rather than committing them to disk.

use anyhow::{Context, Result};
use crawler_types::config::AppConfig;

/// Load `path`, falling back to an all-defaults config if the file is
/// absent (the defaults still require a non-empty `seed_urls` once a crawl
/// actually starts, checked separately at call sites via `--dry-run` or
/// `Scheduler::start`).
pub fn load(path: &str) -> Result<AppConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {path}"))?;
    let mut config: AppConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("failed to parse config file at {path}"))?;

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Environment-variable overrides for secrets that should never live in a
/// checked-in YAML file.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(password) = std::env::var("CRAWLER_REDIS_PASSWORD") {
        config.redis.password = Some(password);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_minimal_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "crawler:\n  seed_urls:\n    - https://example.com/\n"
        )
        .unwrap();

        let config = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.crawler.seed_urls, vec!["https://example.com/"]);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        assert!(load("/nonexistent/path/config.yaml").is_err());
    }

    #[test]
    fn redis_password_env_override_wins_over_file() {
        std::env::set_var("CRAWLER_REDIS_PASSWORD", "from-env");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "redis:\n  password: from-file\n").unwrap();

        let config = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.redis.password.as_deref(), Some("from-env"));
        std::env::remove_var("CRAWLER_REDIS_PASSWORD");
    }
}
