//! Title extraction: the page's `<title>` element, trimmed.

use scraper::{Html, Selector};

pub fn extract(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let text = document.select(&selector).next()?.text().collect::<String>();
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
