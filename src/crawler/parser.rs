//! HTML link extraction
//!
//! Pulls `<a href>` targets out of a page body and canonicalizes them
//! against the page URL.

use crate::url::canonicalize;
use crate::UrlError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links pulled from one HTML document
#[derive(Debug, Clone, Default)]
pub struct ExtractedLinks {
    /// Canonical absolute URLs, deduplicated, in document order
    pub links: Vec<Url>,

    /// Hrefs that could not be turned into a crawlable URL
    pub rejected: Vec<(String, UrlError)>,
}

/// Extracts and canonicalizes every followable link in `html`
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document.
///
/// **Skip silently:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
///
/// Anything else that fails to canonicalize lands in `rejected`.
///
/// # Example
///
/// ```
/// use sitewalk::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page#top">Link</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let extracted = extract_links(html, &base);
/// assert_eq!(extracted.links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> ExtractedLinks {
    let document = Html::parse_document(html);
    let mut extracted = ExtractedLinks::default();
    let mut seen = HashSet::new();

    for href in extract_hrefs(&document) {
        match canonicalize(&href, base_url) {
            Ok(url) => {
                if seen.insert(url.clone()) {
                    extracted.links.push(url);
                }
            }
            Err(e) => extracted.rejected.push((href, e)),
        }
    }

    extracted
}

/// Collects raw href values worth resolving
fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return hrefs;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            let href = href.trim();
            if !is_skippable_href(href) {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

/// Hrefs that never point at a crawlable page
fn is_skippable_href(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return true;
    }

    let lower = href.to_ascii_lowercase();
    ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
