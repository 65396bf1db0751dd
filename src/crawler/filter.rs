//! Link filter chain
//!
//! Decides which candidate links of a page may be claimed. Robots.txt is
//! checked separately by the worker because it needs the network.

use crate::crawler::CrawlConfiguration;
use crate::url::is_within_hosts;
use regex::Regex;
use std::collections::HashSet;
use url::{Position, Url};

/// Why a candidate link was not followed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OffDomain,
    Skipped,
    TooDeep,
}

/// Domain containment, skip patterns and depth limit
#[derive(Debug, Clone)]
pub struct LinkFilter {
    hosts: HashSet<String>,
    skip_patterns: Vec<Regex>,
    depth_limit: Option<u32>,
}

impl LinkFilter {
    pub fn new(hosts: HashSet<String>, skip_patterns: Vec<Regex>, depth_limit: Option<u32>) -> Self {
        Self {
            hosts,
            skip_patterns,
            depth_limit,
        }
    }

    pub fn from_configuration(config: &CrawlConfiguration) -> Self {
        Self::new(
            config.seed_hosts(),
            config.skip_patterns().to_vec(),
            config.options().depth_limit,
        )
    }

    /// Domain and skip checks, shared by links and redirect targets
    pub fn admits(&self, url: &Url) -> Result<(), Rejection> {
        if !is_within_hosts(url, &self.hosts) {
            return Err(Rejection::OffDomain);
        }
        // Path and query only; the authority never takes part
        let target = &url[Position::BeforePath..];
        if self.skip_patterns.iter().any(|p| p.is_match(target)) {
            return Err(Rejection::Skipped);
        }
        Ok(())
    }

    /// True if a page at `depth` may be fetched
    pub fn within_depth(&self, depth: u32) -> bool {
        self.depth_limit.map_or(true, |limit| depth <= limit)
    }

    /// Full chain for a link found on a page at `page_depth`
    pub fn check_link(&self, url: &Url, page_depth: u32) -> Result<(), Rejection> {
        self.admits(url)?;
        if !self.within_depth(page_depth.saturating_add(1)) {
            return Err(Rejection::TooDeep);
        }
        Ok(())
    }

    /// Candidates that pass the chain, in order
    pub fn links_to_follow(&self, candidates: &[Url], page_depth: u32) -> Vec<Url> {
        candidates
            .iter()
            .filter(|url| match self.check_link(url, page_depth) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::debug!("Not following {}: {:?}", url, reason);
                    false
                }
            })
            .cloned()
            .collect()
    }
}
