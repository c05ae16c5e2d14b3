//! Global crawl counters, read by the stats-reporter task and exposable to
//! an external metrics sink (spec.md §6 `monitoring`) without this crate
//! starting an HTTP exporter itself.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Atomics updated by every worker; a monitoring adapter polls
/// [`CrawlStats::snapshot`] to feed Prometheus gauges/counters.
#[derive(Default)]
pub struct CrawlStats {
    pub pages_crawled: AtomicU64,
    pub pages_stored: AtomicU64,
    pub errors: AtomicU64,
    pub duplicates_skipped: AtomicU64,
    pub robots_blocked: AtomicU64,
    pub total_bytes_downloaded: AtomicU64,
    /// Rolling window of recent fetch durations (milliseconds), capped at
    /// 100 samples, for the worker loop's "update rolling-average response
    /// time" step (spec.md §4.5 Worker loop, step 4).
    response_times_ms: Mutex<Vec<u64>>,
}

const RESPONSE_TIME_WINDOW: usize = 100;

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worker loop step 4: bump the crawled count and push this fetch's
    /// duration into the rolling average, for *every* fetch attempt
    /// regardless of outcome (transport error, robots block, oversize, or
    /// success alike).
    pub fn record_crawled(&self, duration_ms: u64) {
        self.pages_crawled.fetch_add(1, Ordering::Relaxed);
        let mut times = self.response_times_ms.lock();
        times.push(duration_ms);
        if times.len() > RESPONSE_TIME_WINDOW {
            times.remove(0);
        }
    }

    /// Worker loop step 6: add downloaded bytes, only reached on the
    /// success path where content was actually read.
    pub fn record_bytes(&self, bytes: u64) {
        self.total_bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_stored(&self) {
        self.pages_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_robots_blocked(&self) {
        self.robots_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_response_time_ms(&self) -> f64 {
        let times = self.response_times_ms.lock();
        if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<u64>() as f64 / times.len() as f64
        }
    }

    pub fn snapshot(&self) -> CrawlStatsSnapshot {
        CrawlStatsSnapshot {
            pages_crawled: self.pages_crawled.load(Ordering::Relaxed),
            pages_stored: self.pages_stored.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            robots_blocked: self.robots_blocked.load(Ordering::Relaxed),
            total_bytes_downloaded: self.total_bytes_downloaded.load(Ordering::Relaxed),
            avg_response_time_ms: self.avg_response_time_ms(),
        }
    }
}

/// Point-in-time copy of [`CrawlStats`], cheap to log or serialize.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CrawlStatsSnapshot {
    pub pages_crawled: u64,
    pub pages_stored: u64,
    pub errors: u64,
    pub duplicates_skipped: u64,
    pub robots_blocked: u64,
    pub total_bytes_downloaded: u64,
    pub avg_response_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_average_tracks_recent_samples() {
        let stats = CrawlStats::new();
        stats.record_crawled(10);
        stats.record_crawled(20);
        assert_eq!(stats.avg_response_time_ms(), 15.0);
    }

    #[test]
    fn rolling_window_caps_at_100_samples() {
        let stats = CrawlStats::new();
        for _ in 0..150 {
            stats.record_crawled(10);
        }
        for _ in 0..50 {
            stats.record_crawled(1000);
        }
        // Only the most recent 100 samples (all 1000ms) should remain... but
        // we only pushed 50 of those, so the window holds 50x1000 + 50x10.
        let avg = stats.avg_response_time_ms();
        assert!(avg > 500.0, "recent high-latency samples should dominate the window");
    }
}
