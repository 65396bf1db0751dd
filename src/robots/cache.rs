//! Per-origin robots.txt cache
//!
//! Each origin's robots.txt is fetched at most once per crawl, on the first
//! question about that origin. Concurrent first questions share one fetch.

use crate::crawler::Transport;
use crate::robots::{fetch_robots, ParsedRobots};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use url::Url;

/// Answers "may this URL be fetched?" for the crawl's user agent
pub struct RobotsCache {
    transport: Arc<dyn Transport>,
    user_agent: String,
    origins: Mutex<HashMap<String, Arc<OnceCell<ParsedRobots>>>>,
}

impl RobotsCache {
    pub fn new(transport: Arc<dyn Transport>, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
            origins: Mutex::new(HashMap::new()),
        }
    }

    /// Checks `url` against its origin's robots.txt, fetching it on first use
    ///
    /// Origins whose robots.txt cannot be retrieved allow everything.
    pub async fn allowed(&self, url: &Url) -> bool {
        let cell = self.cell_for(url);
        let robots = cell
            .get_or_init(|| fetch_robots(self.transport.as_ref(), url))
            .await;

        let allowed = robots.is_allowed(url.as_str(), &self.user_agent);
        if !allowed {
            tracing::debug!("Disallowed by robots.txt: {}", url);
        }
        allowed
    }

    /// Number of origins with a cache slot
    pub fn len(&self) -> usize {
        self.origins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, url: &Url) -> Arc<OnceCell<ParsedRobots>> {
        let key = url.origin().ascii_serialization();
        let mut origins = self.origins.lock().unwrap_or_else(PoisonError::into_inner);
        origins.entry(key).or_default().clone()
    }
}
