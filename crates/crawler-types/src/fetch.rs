//! The outcome of one Fetcher attempt.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result of a single `Fetcher::fetch` call.
///
/// `status_code == 0` together with `error.is_some()` represents a
/// transport-level failure (timeout, DNS, connection refused, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchResult {
    pub url: String,
    pub status_code: u16,
    pub content: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub content_type: Option<String>,
    pub encoding: Option<String>,
    pub fetch_time: f64,
    pub error: Option<String>,
}

impl FetchResult {
    pub fn transport_error(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: 0,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn robots_blocked(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: 403,
            error: Some("Blocked by robots.txt".to_string()),
            ..Default::default()
        }
    }

    /// True when there is no usable body: a transport failure, a non-2xx
    /// status with nothing read, or an explicit error regardless of status.
    pub fn has_usable_content(&self) -> bool {
        self.error.is_none() && self.content.is_some()
    }
}
