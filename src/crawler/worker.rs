//! Fetch workers
//!
//! Each worker loops on the shared frontier: dequeue an entry, wait out the
//! politeness delay, fetch, filter the page's links, publish the accepted
//! ones, run the page hooks and record the page. Redirects are followed by
//! the same worker, one page record per hop.
//!
//! The frontier lease is held until the page (and every redirect hop) is
//! recorded, which is what keeps idle siblings from exiting early.

use crate::crawler::filter::LinkFilter;
use crate::crawler::hooks::Hooks;
use crate::crawler::parser::extract_links;
use crate::crawler::{Frontier, FrontierEntry, Response, Transport};
use crate::page::{FetchError, Page, PageMap};
use crate::robots::RobotsCache;
use crate::url::canonicalize;
use crate::SitewalkError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use url::Url;

/// State shared by every worker of one crawl
pub(crate) struct CrawlContext {
    pub(crate) frontier: Arc<Frontier>,
    pub(crate) transport: Arc<dyn Transport>,
    /// Present only when robots.txt is obeyed
    pub(crate) robots: Option<RobotsCache>,
    pub(crate) filter: LinkFilter,
    pub(crate) hooks: Hooks,
    pub(crate) pages: Mutex<PageMap>,
    pub(crate) delay: Duration,
    pub(crate) discard_page_bodies: bool,
    pub(crate) redirect_limit: u32,
}

impl CrawlContext {
    /// Takes the finished page map out of the context
    pub(crate) fn take_pages(&self) -> PageMap {
        std::mem::take(&mut *self.pages.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, page: Page) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page);
    }
}

/// Runs one worker until the frontier drains or is stopped
///
/// Returns the number of page records this worker produced. A hook error
/// stops the frontier for everyone and is returned.
pub(crate) async fn run_worker(id: usize, ctx: Arc<CrawlContext>) -> Result<usize, SitewalkError> {
    tracing::debug!("Worker {} started", id);
    let mut produced = 0;

    while let Some(lease) = ctx.frontier.dequeue().await {
        let entry = lease.entry().clone();
        match process_entry(&ctx, entry).await {
            Ok(count) => produced += count,
            Err(e) => {
                ctx.frontier.stop();
                return Err(e);
            }
        }
        drop(lease);
    }

    tracing::debug!("Worker {} finished after {} page(s)", id, produced);
    Ok(produced)
}

/// Fetches an entry and any redirect chain behind it
async fn process_entry(ctx: &CrawlContext, entry: FrontierEntry) -> Result<usize, SitewalkError> {
    let FrontierEntry {
        mut url,
        depth,
        referer,
    } = entry;
    let mut hops = 0;
    let mut produced = 0;

    loop {
        let page = fetch_page(ctx, url, depth, referer.clone()).await;
        let next = page.redirected_to.clone();
        finish_page(ctx, page).await?;
        produced += 1;

        let Some(target) = next else {
            break;
        };
        if !follow_redirect(ctx, &target, hops).await {
            break;
        }
        hops += 1;
        url = target;
    }

    Ok(produced)
}

async fn fetch_page(ctx: &CrawlContext, url: Url, depth: u32, referer: Option<Url>) -> Page {
    if !ctx.delay.is_zero() {
        tokio::time::sleep(ctx.delay).await;
    }

    let started = Instant::now();
    let result = ctx.transport.fetch(&url).await;
    let elapsed = started.elapsed();

    let mut page = match result {
        Ok(response) => build_page(ctx, url, depth, referer, response),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            Page::failed(url, depth, referer, e)
        }
    };
    page.response_time = elapsed;

    tracing::debug!(
        "Fetched {} (status {:?}, depth {}, {} link(s)) in {:?}",
        page.url,
        page.status,
        page.depth,
        page.links.len(),
        elapsed
    );
    page
}

/// Turns a raw response into a page record
///
/// Redirects keep no body. Only HTML bodies are kept and scanned for links;
/// a successful non-HTML response is recorded as [`FetchError::NotHtml`].
fn build_page(
    ctx: &CrawlContext,
    url: Url,
    depth: u32,
    referer: Option<Url>,
    response: Response,
) -> Page {
    let mut page = Page::new(url, depth, referer);
    page.status = Some(response.status);
    page.content_type = response.content_type().map(str::to_string);

    if response.is_redirect() {
        if let Some(location) = response.location() {
            match canonicalize(location, &page.url) {
                Ok(target) => page.redirected_to = Some(target),
                Err(e) => ctx.hooks.report_bad_link(&page.url, location, &e),
            }
        }
        return page;
    }

    if page.is_html() {
        let extracted = extract_links(&response.body, &page.url);
        for (href, error) in &extracted.rejected {
            ctx.hooks.report_bad_link(&page.url, href, error);
        }
        page.links = extracted.links;
        page.body = Some(response.body);
    } else if (200..300).contains(&response.status) {
        page.fetch_error = Some(FetchError::NotHtml {
            content_type: page
                .content_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        });
    }

    page
}

/// Publishes links, runs hooks, then records the page
async fn finish_page(ctx: &CrawlContext, mut page: Page) -> Result<(), SitewalkError> {
    if !page.is_redirect() && page.fetch_error.is_none() {
        let candidates = ctx.hooks.select_links(&page);
        let queued = publish_links(ctx, &page, &candidates).await;
        tracing::trace!("Queued {} new link(s) from {}", queued, page.url);
    }

    ctx.hooks.run_page_hooks(&page)?;

    if ctx.discard_page_bodies {
        page.discard_body();
    }
    ctx.record(page);
    Ok(())
}

async fn publish_links(ctx: &CrawlContext, page: &Page, candidates: &[Url]) -> usize {
    let mut queued = 0;

    for mut link in ctx.filter.links_to_follow(candidates, page.depth) {
        // Focus selectors may hand back links that were never canonicalized.
        link.set_fragment(None);

        if ctx.frontier.is_visited(&link) {
            continue;
        }
        if let Some(robots) = &ctx.robots {
            if !robots.allowed(&link).await {
                continue;
            }
        }
        if ctx
            .frontier
            .claim_and_enqueue(link, page.depth + 1, Some(page.url.clone()))
        {
            queued += 1;
        }
    }

    queued
}

/// Decides whether the worker should fetch a redirect target, claiming it if so
async fn follow_redirect(ctx: &CrawlContext, target: &Url, hops: u32) -> bool {
    if hops >= ctx.redirect_limit {
        tracing::warn!(
            "Redirect limit of {} reached, not following {}",
            ctx.redirect_limit,
            target
        );
        return false;
    }
    if let Err(reason) = ctx.filter.admits(target) {
        tracing::debug!("Not following redirect to {}: {:?}", target, reason);
        return false;
    }
    if let Some(robots) = &ctx.robots {
        if !robots.allowed(target).await {
            return false;
        }
    }
    if !ctx.frontier.claim(target) {
        tracing::debug!("Redirect target {} already claimed", target);
        return false;
    }
    true
}
