//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns one crawl from start to finish:
//! - Seeding the frontier with each start URL at depth 0
//! - Spawning the worker pool
//! - Waiting for the frontier to drain (or for a worker to fail)
//! - Handing the finished page map to the caller
//!
//! It never fetches anything itself.

use crate::crawler::filter::LinkFilter;
use crate::crawler::worker::{run_worker, CrawlContext};
use crate::crawler::{CrawlConfiguration, Frontier, HttpTransport, Transport};
use crate::page::PageMap;
use crate::robots::RobotsCache;
use crate::SitewalkError;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinSet;

/// Requests cooperative cancellation of a running crawl
///
/// Workers finish the entry they are on and exit; the crawl then returns
/// the pages recorded so far.
#[derive(Debug, Clone)]
pub struct StopHandle {
    frontier: Arc<Frontier>,
}

impl StopHandle {
    pub fn stop(&self) {
        tracing::info!("Stop requested");
        self.frontier.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.frontier.is_stopped()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlConfiguration,
    context: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a coordinator fetching over HTTP
    ///
    /// The client is built from the configured user agent and timeout.
    pub fn new(config: CrawlConfiguration) -> Result<Self, SitewalkError> {
        let transport = HttpTransport::new(&config.options().user_agent, config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a coordinator fetching through `transport`
    pub fn with_transport(config: CrawlConfiguration, transport: Arc<dyn Transport>) -> Self {
        let options = config.options();
        let robots = options
            .obey_robots_txt
            .then(|| RobotsCache::new(transport.clone(), options.user_agent.clone()));

        let context = CrawlContext {
            frontier: Arc::new(Frontier::new()),
            transport,
            robots,
            filter: LinkFilter::from_configuration(&config),
            hooks: config.hooks().clone(),
            pages: Mutex::new(PageMap::new()),
            delay: config.delay(),
            discard_page_bodies: options.discard_page_bodies,
            redirect_limit: options.redirect_limit,
        };

        Self {
            config,
            context: Arc::new(context),
        }
    }

    /// Returns a handle that can stop the crawl from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            frontier: self.context.frontier.clone(),
        }
    }

    /// Runs the crawl to completion and returns every page recorded
    ///
    /// The first hook error (or worker panic) stops the remaining workers
    /// after their current entry and is returned instead of the pages.
    pub async fn run(self) -> Result<PageMap, SitewalkError> {
        let start_time = Instant::now();
        let frontier = &self.context.frontier;
        let worker_count = self.config.options().workers as usize;

        for seed in self.config.seeds() {
            frontier.claim_and_enqueue(seed.clone(), 0, None);
        }
        tracing::info!(
            "Starting crawl of {} seed(s) with {} worker(s)",
            self.config.seeds().len(),
            worker_count
        );

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            workers.spawn(run_worker(id, self.context.clone()));
        }

        let mut failure = None;
        while let Some(joined) = workers.join_next().await {
            let outcome = joined.map_err(SitewalkError::from).and_then(|r| r);
            if let Err(e) = outcome {
                frontier.stop();
                if failure.is_none() {
                    tracing::error!("Crawl aborted: {}", e);
                    failure = Some(e);
                }
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        let pages = self.context.take_pages();
        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl completed: {} pages in {:.2?} ({:.2} pages/sec)",
            pages.len(),
            elapsed,
            pages.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );

        self.context.hooks.run_after_crawl(&pages)?;
        Ok(pages)
    }
}

/// Crawls from the configured seeds over HTTP and returns the page map
///
/// # Example
///
/// ```no_run
/// use sitewalk::config::CrawlerConfig;
/// use sitewalk::crawler::{crawl, CrawlConfiguration};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfiguration::new(["https://example.com/"], CrawlerConfig::default())?;
/// let pages = crawl(config).await?;
/// assert!(pages.contains_str("https://example.com/"));
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfiguration) -> Result<PageMap, SitewalkError> {
    Coordinator::new(config)?.run().await
}

/// Same as [`crawl`], fetching through a caller-supplied transport
pub async fn crawl_with_transport(
    config: CrawlConfiguration,
    transport: Arc<dyn Transport>,
) -> Result<PageMap, SitewalkError> {
    Coordinator::with_transport(config, transport).run().await
}
