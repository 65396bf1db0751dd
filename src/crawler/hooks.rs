//! User hook points
//!
//! Hooks are plain function values stored in the crawl configuration and
//! invoked synchronously on the worker that produced the page. They may run
//! concurrently on different workers, so they must be `Send + Sync`.

use crate::page::{Page, PageMap};
use crate::{SitewalkError, UrlError};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Called with every finished page; an error aborts the crawl
pub type PageCallback = Arc<dyn Fn(&Page) -> anyhow::Result<()> + Send + Sync>;

/// Chooses which links of a page to follow, replacing `page.links`
pub type FocusSelector = Arc<dyn Fn(&Page) -> Vec<Url> + Send + Sync>;

/// Diagnostic for a link that could not be canonicalized: (page, href, error)
pub type BadLinkCallback = Arc<dyn Fn(&Url, &str, &UrlError) + Send + Sync>;

/// Called once with the finished page map
pub type AfterCrawlCallback = Arc<dyn Fn(&PageMap) -> anyhow::Result<()> + Send + Sync>;

/// Every hook registered for one crawl
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) on_every_page: Vec<PageCallback>,
    pub(crate) on_pages_like: Vec<(Regex, PageCallback)>,
    pub(crate) focus: Option<FocusSelector>,
    pub(crate) on_bad_link: Option<BadLinkCallback>,
    pub(crate) after_crawl: Vec<AfterCrawlCallback>,
}

impl Hooks {
    /// Runs page callbacks in registration order, stopping at the first error
    pub(crate) fn run_page_hooks(&self, page: &Page) -> Result<(), SitewalkError> {
        let hook_error = |source| SitewalkError::Hook {
            url: page.url.to_string(),
            source,
        };

        for callback in &self.on_every_page {
            callback(page).map_err(hook_error)?;
        }

        for (pattern, callback) in &self.on_pages_like {
            if pattern.is_match(page.url.as_str()) {
                callback(page).map_err(hook_error)?;
            }
        }

        Ok(())
    }

    /// Links the crawl should consider following from `page`
    pub(crate) fn select_links(&self, page: &Page) -> Vec<Url> {
        match &self.focus {
            Some(select) => select(page),
            None => page.links.clone(),
        }
    }

    pub(crate) fn report_bad_link(&self, page: &Url, href: &str, error: &UrlError) {
        tracing::debug!("Dropping link {:?} on {}: {}", href, page, error);
        if let Some(callback) = &self.on_bad_link {
            callback(page, href, error);
        }
    }

    pub(crate) fn run_after_crawl(&self, pages: &PageMap) -> Result<(), SitewalkError> {
        for callback in &self.after_crawl {
            callback(pages).map_err(SitewalkError::AfterCrawl)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_every_page", &self.on_every_page.len())
            .field(
                "on_pages_like",
                &self
                    .on_pages_like
                    .iter()
                    .map(|(p, _)| p.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("focus", &self.focus.is_some())
            .field("on_bad_link", &self.on_bad_link.is_some())
            .field("after_crawl", &self.after_crawl.len())
            .finish()
    }
}
