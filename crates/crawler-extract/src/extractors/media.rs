//! Image extraction: every `<img src>`, resolved and validated the same way
//! as outbound links.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::normalize::{is_valid_url, resolve_and_normalize};

pub fn extract(document: &Html, page_url: &url::Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for element in document.select(&selector) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let Some(normalized) = resolve_and_normalize(page_url, src) else {
            continue;
        };
        if !is_valid_url(&normalized, &[], &[]) {
            continue;
        }
        if seen.insert(normalized.clone()) {
            images.push(normalized);
        }
    }
    images
}
