//! Page record definitions
//!
//! A [`Page`] describes one fetched (or failed) resource. Exactly one record
//! exists per canonical URL claimed during a crawl, including URLs whose
//! fetch failed, so they are accounted for and never fetched twice.

use chrono::{DateTime, Utc};
use scraper::Html;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a page has no usable content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Expected HTML, got {content_type}")]
    NotHtml { content_type: String },

    #[error("Request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Classifies a reqwest error the same way for pages and robots.txt
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Other(error.to_string())
        }
    }
}

/// The stored result of fetching (or attempting) one canonical URL
#[derive(Debug, Clone)]
pub struct Page {
    /// Canonical URL of this page
    pub url: Url,

    /// HTTP status code, absent if the request never got a response
    pub status: Option<u16>,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Raw body; `None` for redirects, failures, or when bodies are discarded
    pub body: Option<String>,

    /// Canonical absolute URLs linked from this page, in document order
    pub links: Vec<Url>,

    /// Target of an HTTP redirect
    pub redirected_to: Option<Url>,

    /// Distance from the nearest seed (seeds are 0)
    pub depth: u32,

    /// Page whose link led here; `None` for seeds
    pub referer: Option<Url>,

    /// Set when the fetch failed or produced unusable content
    pub fetch_error: Option<FetchError>,

    /// When the response (or failure) was received
    pub fetched_at: DateTime<Utc>,

    /// Time spent waiting on the transport
    pub response_time: Duration,
}

impl Page {
    /// Creates an empty record for `url` at the given depth and referer
    pub fn new(url: Url, depth: u32, referer: Option<Url>) -> Self {
        Self {
            url,
            status: None,
            content_type: None,
            body: None,
            links: Vec::new(),
            redirected_to: None,
            depth,
            referer,
            fetch_error: None,
            fetched_at: Utc::now(),
            response_time: Duration::ZERO,
        }
    }

    /// Creates a record for a fetch that failed before producing a page
    pub fn failed(url: Url, depth: u32, referer: Option<Url>, error: FetchError) -> Self {
        Self {
            fetch_error: Some(error),
            ..Self::new(url, depth, referer)
        }
    }

    /// Returns true if the Content-Type is HTML
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(is_html_content_type)
    }

    /// Returns true if this page is an HTTP redirect
    pub fn is_redirect(&self) -> bool {
        self.redirected_to.is_some()
    }

    /// Returns true for a 404 response
    pub fn not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Returns true if the page was fetched with a 2xx status and no error
    pub fn is_success(&self) -> bool {
        self.fetch_error.is_none() && self.status.is_some_and(|s| (200..300).contains(&s))
    }

    /// Parses the retained body into a queryable document
    ///
    /// Returns `None` when the body was discarded or the page is not HTML.
    pub fn document(&self) -> Option<Html> {
        if !self.is_html() {
            return None;
        }
        self.body.as_deref().map(Html::parse_document)
    }

    /// Releases the body to bound memory
    pub fn discard_body(&mut self) {
        self.body = None;
    }
}

/// Returns true for `text/html` and `application/xhtml+xml`, ignoring parameters
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
