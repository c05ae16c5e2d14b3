//! Hash computation for the four duplicate-detection strategies.

use std::collections::HashMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crawler_types::content::ParsedContent;

const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "ref",
    "source",
    "campaign",
];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "before", "after", "above", "below",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "i", "you", "he", "she", "it", "we", "they",
];

/// Normalize a URL the way the duplicate detector needs (distinct from, and
/// stricter than, the Parser's own link normalization): lowercase, fragment
/// dropped, tracking params filtered out, remaining params sorted, trailing
/// slash trimmed unless the path is `/`.
fn dedup_normalize_url(url: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_lowercase();
    };

    parsed.set_fragment(None);

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&query));
    }

    if parsed.path() != "/" && parsed.path().ends_with('/') {
        let trimmed = parsed.path().trim_end_matches('/').to_string();
        parsed.set_path(&trimmed);
    }

    parsed.to_string().to_lowercase()
}

fn collapse_whitespace_lower(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn url_hash(url: &str) -> String {
    let normalized = dedup_normalize_url(url);
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}

pub fn content_hash(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let normalized = collapse_whitespace_lower(content);
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}

pub fn title_hash(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }
    let normalized = collapse_whitespace_lower(title);
    format!("{:x}", md5::compute(normalized.as_bytes()))
}

#[derive(Serialize)]
struct FuzzyFeatures {
    word_count_bucket: u64,
    char_count_bucket: u64,
    title_word_count: usize,
    significant_word_count: usize,
    top_words: Vec<String>,
}

fn significant_words(content: &str) -> Vec<String> {
    content
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3 && !STOPWORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

fn top_ten_by_frequency(words: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (idx, word) in words.iter().enumerate() {
        *counts.entry(word.as_str()).or_insert(0) += 1;
        first_seen.entry(word.as_str()).or_insert(idx);
    }

    let mut unique: Vec<&str> = counts.keys().copied().collect();
    unique.sort_by(|a, b| {
        counts[b]
            .cmp(&counts[a])
            .then_with(|| first_seen[a].cmp(&first_seen[b]))
    });
    unique.into_iter().take(10).map(|w| w.to_string()).collect()
}

pub fn fuzzy_hash(content: &str, title: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let word_count = content.split_whitespace().count();
    let char_count = content.chars().count();
    let title_word_count = title.split_whitespace().count();
    let significant = significant_words(content);
    let top_words = top_ten_by_frequency(&significant);

    let features = FuzzyFeatures {
        word_count_bucket: (word_count / 100) as u64,
        char_count_bucket: (char_count / 1000) as u64,
        title_word_count,
        significant_word_count: significant.len(),
        top_words,
    };

    let json = serde_json::to_string(&features).expect("FuzzyFeatures always serializes");
    format!("{:x}", md5::compute(json.as_bytes()))
}

/// Compute all four hashes for a parsed page in one pass.
pub fn hash_bundle(parsed: &ParsedContent) -> crawler_types::content::ContentHashBundle {
    let content = parsed.content.as_deref().unwrap_or("");
    let title = parsed.title.as_deref().unwrap_or("");
    crawler_types::content::ContentHashBundle {
        url_hash: url_hash(&parsed.url),
        content_hash: content_hash(content),
        title_hash: title_hash(title),
        fuzzy_hash: fuzzy_hash(content, title),
    }
}
