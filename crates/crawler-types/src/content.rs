//! The structured record produced by the Parser and consumed by dedup,
//! storage, and link enqueueing.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Parsed representation of one fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub url: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub language: Option<String>,
    pub author: Option<String>,
    pub canonical_url: Option<String>,
    pub links: HashSet<String>,
    pub images: HashSet<String>,
    /// Schema.org data bucketed by `@type`.
    pub schema_org_data: HashMap<String, Vec<serde_json::Value>>,
    /// h1..h6, ordered list of non-empty stripped heading texts.
    pub headings: HashMap<String, Vec<String>>,
    pub word_count: u32,
}

impl ParsedContent {
    /// A ParsedContent carrying only the URL — the "parse error" outcome
    /// from spec.md §7: the worker proceeds but there is nothing to store.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Derived hashes for a given [`ParsedContent`]; see the Duplicate Detector
/// for how each is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHashBundle {
    /// Empty string means "not computable" (e.g. no content) and must never
    /// be treated as a match.
    pub url_hash: String,
    pub content_hash: String,
    pub title_hash: String,
    pub fuzzy_hash: String,
}

impl ContentHashBundle {
    pub fn is_empty(hash: &str) -> bool {
        hash.is_empty()
    }
}
