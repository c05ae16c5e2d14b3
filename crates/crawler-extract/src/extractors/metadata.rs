//! `<meta>`, `<link rel=canonical>`, and `<html lang>` extraction.

use scraper::{Html, Selector};

fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn extract_description(document: &Html) -> Option<String> {
    meta_content(document, "meta[name='description']")
        .or_else(|| meta_content(document, "meta[property='og:description']"))
}

pub fn extract_keywords(document: &Html) -> Option<String> {
    meta_content(document, "meta[name='keywords']")
}

pub fn extract_author(document: &Html) -> Option<String> {
    meta_content(document, "meta[name='author']")
        .or_else(|| meta_content(document, "meta[property='article:author']"))
}

pub fn extract_language(document: &Html) -> Option<String> {
    let html_selector = Selector::parse("html").ok()?;
    let html = document.select(&html_selector).next()?;
    html.value()
        .attr("lang")
        .or_else(|| html.value().attr("xml:lang"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn extract_canonical_url(document: &Html, page_url: &str) -> Option<String> {
    let selector = Selector::parse("link[rel='canonical']").ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    let base = url::Url::parse(page_url).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}
