//! HTML link extraction
//!
//! This module pulls raw link strings out of fetched HTML. Links are returned
//! exactly as written in the page; resolving them against the page URL is the
//! coordinator's job.

use scraper::{Html, Selector};

/// Prefixes of hrefs that never point at a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracts raw link strings from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Empty and fragment-only hrefs (same page anchors)
///
/// # Example
///
/// ```
/// use site_mapper::crawler::extract_links;
///
/// let html = r#"<html><body><a href="./about">About</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["./about".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href").and_then(keep_href) {
                links.push(href);
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href").and_then(keep_href) {
                links.push(href);
            }
        }
    }

    links
}

/// Returns the trimmed href if it may lead to another page
fn keep_href(href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return None;
    }

    Some(href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_relative_links_kept_raw() {
        let html = r#"<html><body>
            <a href="/other">A</a>
            <a href="./sibling">B</a>
            <a href="../up">C</a>
        </body></html>"#;
        assert_eq!(extract_links(html), vec!["/other", "./sibling", "../up"]);
    }

    #[test]
    fn test_href_whitespace_trimmed() {
        let html = r#"<html><body><a href="  /padded  ">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/padded"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="JavaScript:alert(1)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
        </body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let html = r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_fragment_only_and_empty() {
        let html = r##"<html><body><a href="#section">Jump</a><a href="">Empty</a></body></html>"##;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_follow_nofollow_links() {
        let html = r#"<html><body><a href="/page" rel="nofollow">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/page"]);
    }

    #[test]
    fn test_extract_canonical_link() {
        let html = r#"<html><head><link rel="canonical" href="https://example.com/canonical" /><link rel="stylesheet" href="/style.css" /></head><body></body></html>"#;
        assert_eq!(extract_links(html), vec!["https://example.com/canonical"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a><a href="/real">Real</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/real"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let html = r#"<html><body><a href="/a">1</a><a href="/a">2</a></body></html>"#;
        assert_eq!(extract_links(html).len(), 2);
    }
}
