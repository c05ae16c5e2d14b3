//! Heading extraction: for each of h1..h6, the ordered list of non-empty
//! stripped texts.

use std::collections::HashMap;

use scraper::{Html, Selector};

const LEVELS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

pub fn extract(document: &Html) -> HashMap<String, Vec<String>> {
    let mut map = HashMap::new();
    for level in LEVELS {
        let Ok(selector) = Selector::parse(level) else {
            continue;
        };
        let texts: Vec<String> = document
            .select(&selector)
            .filter_map(|el| {
                let text = el.text().collect::<String>();
                let trimmed = text.trim().to_string();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            })
            .collect();
        if !texts.is_empty() {
            map.insert(level.to_string(), texts);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_headings_by_level_in_document_order() {
        let doc = Html::parse_document(
            r#"<html><body><h1>Title</h1><p>text</p><h2>Sub One</h2><h2>Sub Two</h2></body></html>"#,
        );
        let map = extract(&doc);
        assert_eq!(map.get("h1"), Some(&vec!["Title".to_string()]));
        assert_eq!(
            map.get("h2"),
            Some(&vec!["Sub One".to_string(), "Sub Two".to_string()])
        );
        assert!(!map.contains_key("h3"));
    }

    #[test]
    fn skips_empty_headings() {
        let doc = Html::parse_document(r#"<html><body><h1>   </h1><h2>Real</h2></body></html>"#);
        let map = extract(&doc);
        assert!(!map.contains_key("h1"));
        assert_eq!(map.get("h2"), Some(&vec!["Real".to_string()]));
    }

    #[test]
    fn no_headings_yields_empty_map() {
        let doc = Html::parse_document("<html><body><p>no headings</p></body></html>");
        assert!(extract(&doc).is_empty());
    }
}
