//! In-memory site used by crawler unit tests

use crate::crawler::{Response, Transport};
use crate::page::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LOCATION};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use url::Url;

enum Resource {
    Page(Response),
    Error(FetchError),
}

/// Serves canned responses keyed by full URL and records every request
#[derive(Default)]
pub(crate) struct MockSite {
    resources: HashMap<String, Resource>,
    requests: Mutex<Vec<Url>>,
}

impl MockSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An HTML page linking to each of `links` (hrefs as written)
    pub(crate) fn html(mut self, url: &str, links: &[&str]) -> Self {
        let body = links
            .iter()
            .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
            .collect::<Vec<_>>()
            .join("\n");
        let body = format!("<html><body>{}</body></html>", body);
        self.resources
            .insert(url.to_string(), Resource::Page(response(200, "text/html", body)));
        self
    }

    pub(crate) fn text(mut self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        self.resources.insert(
            url.to_string(),
            Resource::Page(response(status, content_type, body.to_string())),
        );
        self
    }

    pub(crate) fn redirect(mut self, url: &str, location: &str) -> Self {
        let mut page = response(301, "text/html", String::new());
        page.headers
            .insert(LOCATION, HeaderValue::from_str(location).unwrap());
        self.resources.insert(url.to_string(), Resource::Page(page));
        self
    }

    pub(crate) fn failing(mut self, url: &str, error: FetchError) -> Self {
        self.resources.insert(url.to_string(), Resource::Error(error));
        self
    }

    /// URLs requested so far, in request order
    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn response(status: u16, content_type: &str, body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    Response {
        status,
        headers,
        body,
    }
}

#[async_trait]
impl Transport for MockSite {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());

        match self.resources.get(url.as_str()) {
            Some(Resource::Page(page)) => Ok(page.clone()),
            Some(Resource::Error(error)) => Err(error.clone()),
            None => Ok(response(404, "text/html", "<html></html>".to_string())),
        }
    }
}
