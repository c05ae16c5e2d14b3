//! schema.org structured data: JSON-LD `<script type="application/ld+json">`
//! blocks bucketed by `@type`, plus microdata (`itemtype`/`itemprop`)
//! flattened into a simple property map per item.

use std::collections::HashMap;

use scraper::{Html, Selector};
use serde_json::Value;

/// Parse every ld+json block on the page, bucketing objects by their
/// `@type` value. A top-level JSON array is flattened — each element is
/// bucketed independently, same as if each had appeared in its own script
/// tag.
pub fn extract_json_ld(document: &Html) -> HashMap<String, Vec<Value>> {
    let mut buckets: HashMap<String, Vec<Value>> = HashMap::new();
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return buckets;
    };

    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };
        for item in flatten(value) {
            let type_key = item
                .get("@type")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            buckets.entry(type_key).or_default().push(item);
        }
    }
    buckets
}

fn flatten(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Extract both schema.org sources and merge them into one set of buckets:
/// JSON-LD objects bucketed by `@type`, plus microdata items bucketed by the
/// last `/`-segment of their `itemtype` URL (e.g. `https://schema.org/Product`
/// -> `Product`), so a page mixing both conventions for the same type lands
/// in a single bucket, matching the original's merge behavior.
pub fn extract(document: &Html) -> HashMap<String, Vec<Value>> {
    let mut buckets = extract_json_ld(document);
    for (itemtype, props) in extract_microdata(document) {
        let type_key = itemtype_last_segment(&itemtype);
        let object = props
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<serde_json::Map<String, Value>>();
        buckets.entry(type_key).or_default().push(Value::Object(object));
    }
    buckets
}

fn itemtype_last_segment(itemtype: &str) -> String {
    itemtype
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(itemtype)
        .to_string()
}

/// Microdata: for each element carrying `itemtype`, collect its descendant
/// `itemprop` elements into a flat `name -> value` map, keyed by the
/// `itemtype` URL.
pub fn extract_microdata(document: &Html) -> Vec<(String, HashMap<String, String>)> {
    let mut items = Vec::new();
    let Ok(item_selector) = Selector::parse("[itemtype]") else {
        return items;
    };
    let Ok(prop_selector) = Selector::parse("[itemprop]") else {
        return items;
    };

    for scope in document.select(&item_selector) {
        let Some(itemtype) = scope.value().attr("itemtype") else {
            continue;
        };
        let mut props = HashMap::new();
        for prop_el in scope.select(&prop_selector) {
            let Some(name) = prop_el.value().attr("itemprop") else {
                continue;
            };
            let value = prop_el
                .value()
                .attr("content")
                .map(|s| s.to_string())
                .unwrap_or_else(|| prop_el.text().collect::<String>().trim().to_string());
            props.insert(name.to_string(), value);
        }
        items.push((itemtype.to_string(), props));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_json_ld_objects_by_type() {
        let doc = Html::parse_document(
            r#"<html><head>
                <script type="application/ld+json">{"@type": "Article", "headline": "Hi"}</script>
                <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
            </head></html>"#,
        );
        let buckets = extract_json_ld(&doc);
        assert_eq!(buckets["Article"].len(), 1);
        assert_eq!(buckets["Organization"].len(), 1);
    }

    #[test]
    fn flattens_top_level_arrays() {
        let doc = Html::parse_document(
            r#"<html><head>
                <script type="application/ld+json">[{"@type": "Article"}, {"@type": "Article"}]</script>
            </head></html>"#,
        );
        let buckets = extract_json_ld(&doc);
        assert_eq!(buckets["Article"].len(), 2);
    }

    #[test]
    fn invalid_json_is_skipped_without_panicking() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">not json</script></head></html>"#,
        );
        assert!(extract_json_ld(&doc).is_empty());
    }

    #[test]
    fn microdata_collects_props_for_each_itemtype() {
        let doc = Html::parse_document(
            r#"<html><body>
                <div itemtype="https://schema.org/Product">
                    <span itemprop="name">Widget</span>
                    <span itemprop="price" content="9.99"></span>
                </div>
            </body></html>"#,
        );
        let items = extract_microdata(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, "https://schema.org/Product");
        assert_eq!(items[0].1.get("name"), Some(&"Widget".to_string()));
        assert_eq!(items[0].1.get("price"), Some(&"9.99".to_string()));
    }

    #[test]
    fn extract_merges_json_ld_and_microdata_by_type_name() {
        let doc = Html::parse_document(
            r#"<html><head>
                <script type="application/ld+json">{"@type": "Article", "headline": "Hi"}</script>
            </head>
            <body>
                <div itemtype="https://schema.org/Product">
                    <span itemprop="name">Widget</span>
                </div>
            </body></html>"#,
        );
        let buckets = extract(&doc);
        assert_eq!(buckets["Article"].len(), 1);
        assert_eq!(buckets["Product"].len(), 1);
        assert_eq!(
            buckets["Product"][0].get("name").and_then(Value::as_str),
            Some("Widget")
        );
    }

    #[test]
    fn itemtype_last_segment_strips_trailing_slash_and_path() {
        assert_eq!(itemtype_last_segment("https://schema.org/Product"), "Product");
        assert_eq!(itemtype_last_segment("https://schema.org/Product/"), "Product");
        assert_eq!(itemtype_last_segment("Product"), "Product");
    }
}
