//! Outbound link extraction: every `<a href>`, resolved against the page
//! URL, normalized, filtered by domain allow/block lists, and deduplicated.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::normalize::{is_valid_url, resolve_and_normalize};

pub fn extract(
    document: &Html,
    page_url: &url::Url,
    allowed_domains: &[String],
    blocked_domains: &[String],
) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(normalized) = resolve_and_normalize(page_url, href) else {
            continue;
        };
        if !is_valid_url(&normalized, allowed_domains, blocked_domains) {
            continue;
        }
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }
    links
}
