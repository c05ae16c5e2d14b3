//! Main content extraction: pick the primary content region, strip
//! navigation/boilerplate subtrees, and clean the remaining text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::clean::clean_text;

/// Strips `<script>`/`<style>`/`<noscript>` blocks and HTML comments before
/// the last-resort whole-document fallback runs — the targeted selectors
/// used everywhere else never descend into those tags, so this only
/// matters for pages with no matching paragraph-like elements at all.
static BOILERPLATE_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</\1>|<!--.*?-->")
        .expect("static boilerplate regex is valid")
});

const MAIN_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    ".content",
    ".main-content",
    "#content",
    "#main",
];

const EXCLUDED_SELECTORS: &[&str] = &["nav", "footer", "aside", ".sidebar", ".navigation", ".menu"];

fn find_root<'a>(document: &'a Html) -> ElementRef<'a> {
    for selector_str in MAIN_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(el) = document.select(&selector).next() {
                return el;
            }
        }
    }
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return body;
        }
    }
    document.root_element()
}

fn excluded_selectors() -> Vec<Selector> {
    EXCLUDED_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

fn is_within_excluded(element: &ElementRef, excluded: &[Selector]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| excluded.iter().any(|sel| sel.matches(&ancestor)))
}

/// Extract the page's main textual content: locate the primary region,
/// drop anything nested under a navigation/boilerplate container, and run
/// the remaining text through `clean_text`.
pub fn extract(document: &Html) -> String {
    let root = find_root(document);
    let excluded = excluded_selectors();

    let Ok(text_selector) = Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote, td") else {
        return String::new();
    };

    let mut pieces = Vec::new();
    for element in root.select(&text_selector) {
        if is_within_excluded(&element, &excluded) {
            continue;
        }
        let text: String = element.text().collect();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed.to_string());
        }
    }

    if pieces.is_empty() {
        let stripped = BOILERPLATE_TAGS.replace_all(&root.html(), " ");
        let fragment = Html::parse_fragment(&stripped);
        let fallback: String = fragment.root_element().text().collect();
        return clean_text(&fallback);
    }

    clean_text(&pieces.join(" "))
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_main_element_over_surrounding_chrome() {
        let doc = Html::parse_document(
            r#"<html><body>
                <nav><a href="/">Home</a></nav>
                <main><p>The real content lives here.</p></main>
                <footer>copyright 2024</footer>
            </body></html>"#,
        );
        let content = extract(&doc);
        assert!(content.contains("real content"));
        assert!(!content.contains("Home"));
        assert!(!content.contains("copyright"));
    }

    #[test]
    fn falls_back_to_body_when_no_main_region_exists() {
        let doc = Html::parse_document("<html><body><p>Just a body paragraph.</p></body></html>");
        assert!(extract(&doc).contains("Just a body paragraph"));
    }

    #[test]
    fn excludes_sidebar_class_even_inside_main() {
        let doc = Html::parse_document(
            r#"<html><body><main>
                <p>Primary text.</p>
                <div class="sidebar"><p>Unrelated promo text.</p></div>
            </main></body></html>"#,
        );
        let content = extract(&doc);
        assert!(content.contains("Primary text"));
        assert!(!content.contains("Unrelated promo"));
    }

    #[test]
    fn word_count_counts_whitespace_separated_tokens() {
        assert_eq!(word_count("one two  three"), 3);
        assert_eq!(word_count(""), 0);
    }
}
