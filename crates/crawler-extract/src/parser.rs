//! Orchestrates the extractors into one [`ParsedContent`] record.

use std::collections::HashSet;

use crawler_types::content::ParsedContent;
use crawler_types::error::Result;
use scraper::Html;
use tracing::debug;

use crate::extractors::{content, headings, links, media, metadata, schema, title};

/// Converts fetched HTML into a [`ParsedContent`] record: title, main text,
/// metadata, headings, links, images, and schema.org data. Link/image sets
/// are normalized and filtered against the supplied allow/block lists and
/// extension blacklist as they're extracted.
pub struct Parser {
    allowed_domains: Vec<String>,
    blocked_domains: Vec<String>,
}

impl Parser {
    pub fn new(allowed_domains: Vec<String>, blocked_domains: Vec<String>) -> Self {
        Self {
            allowed_domains,
            blocked_domains,
        }
    }

    /// Parse one fetched page. `page_url` is the final URL after redirects —
    /// link/image resolution and canonical-URL resolution are relative to
    /// it, not the originally requested URL.
    pub fn parse(&self, page_url: &str, html: &str) -> Result<ParsedContent> {
        let parsed_url = url::Url::parse(page_url)?;
        let document = Html::parse_document(html);

        let title = title::extract(&document);
        let meta_description = metadata::extract_description(&document);
        let meta_keywords = metadata::extract_keywords(&document);
        let author = metadata::extract_author(&document);
        let language = metadata::extract_language(&document);
        let canonical_url = metadata::extract_canonical_url(&document, page_url);

        let link_list = links::extract(
            &document,
            &parsed_url,
            &self.allowed_domains,
            &self.blocked_domains,
        );
        let image_list = media::extract(&document, &parsed_url);
        let headings_map = headings::extract(&document);
        let schema_org_data = schema::extract(&document);

        let main_content = content::extract(&document);
        let word_count = content::word_count(&main_content) as u32;

        debug!(
            url = %page_url,
            links = link_list.len(),
            images = image_list.len(),
            word_count,
            "parsed page"
        );

        Ok(ParsedContent {
            url: page_url.to_string(),
            title,
            content: if main_content.is_empty() {
                None
            } else {
                Some(main_content)
            },
            meta_description,
            meta_keywords,
            language,
            author,
            canonical_url,
            links: link_list.into_iter().collect::<HashSet<_>>(),
            images: image_list.into_iter().collect::<HashSet<_>>(),
            schema_org_data,
            headings: headings_map,
            word_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_html() -> &'static str {
        r#"<html lang="en">
            <head>
                <title>Example Page</title>
                <meta name="description" content="An example page for tests">
                <link rel="canonical" href="/canonical">
                <script type="application/ld+json">{"@type": "Article", "headline": "Hi"}</script>
            </head>
            <body>
                <nav><a href="/">Home</a></nav>
                <main>
                    <h1>Main Heading</h1>
                    <p>This is the real content of the page.</p>
                    <a href="/next">Next page</a>
                    <img src="/pic.jpg">
                    <div itemtype="https://schema.org/Product">
                        <span itemprop="name">Widget</span>
                    </div>
                </main>
                <footer>copyright</footer>
            </body>
        </html>"#
    }

    #[test]
    fn parses_a_representative_page_end_to_end() {
        let parser = Parser::new(vec![], vec![]);
        let parsed = parser.parse("https://example.com/page", sample_html()).unwrap();

        assert_eq!(parsed.title.as_deref(), Some("Example Page"));
        assert_eq!(parsed.language.as_deref(), Some("en"));
        assert_eq!(
            parsed.canonical_url.as_deref(),
            Some("https://example.com/canonical")
        );
        assert!(parsed.content.as_deref().unwrap().contains("real content"));
        assert!(!parsed.content.as_deref().unwrap().contains("copyright"));
        assert!(parsed.links.contains("https://example.com/next"));
        assert!(parsed.images.contains("https://example.com/pic.jpg"));
        assert_eq!(
            parsed.headings.get("h1"),
            Some(&vec!["Main Heading".to_string()])
        );
        assert!(parsed.schema_org_data.contains_key("Article"));
        assert!(parsed.schema_org_data.contains_key("Product"));
        assert!(parsed.word_count > 0);
    }

    #[test]
    fn parsing_is_idempotent_on_links_images_and_headings() {
        let parser = Parser::new(vec![], vec![]);
        let first = parser.parse("https://example.com/page", sample_html()).unwrap();
        let second = parser.parse("https://example.com/page", sample_html()).unwrap();
        assert_eq!(first.links, second.links);
        assert_eq!(first.images, second.images);
        assert_eq!(first.headings, second.headings);
    }

    #[test]
    fn invalid_page_url_is_rejected() {
        let parser = Parser::new(vec![], vec![]);
        assert!(parser.parse("not a url", "<html></html>").is_err());
    }
}
