//! Statistics generation from a finished crawl
//!
//! This module derives summary numbers from a [`PageMap`] and prints them.

use crate::page::{FetchError, PageMap};
use crate::url::host_of;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Total number of page records
    pub total_pages: u64,

    /// Pages fetched with a 2xx status and no error
    pub successful_pages: u64,

    /// Pages that are HTTP redirects
    pub redirects: u64,

    /// Pages that answered 404
    pub not_found: u64,

    /// Count of pages per depth
    pub pages_by_depth: BTreeMap<u32, u64>,

    /// Count of pages per HTTP status (failed fetches have none)
    pub pages_by_status: BTreeMap<u16, u64>,

    /// Number of unique hosts among the pages
    pub unique_hosts: u64,

    /// Total number of outbound links extracted
    pub total_links: u64,

    /// Fetch errors grouped by kind
    pub error_summary: HashMap<&'static str, u64>,
}

impl CrawlStatistics {
    pub fn from_pages(pages: &PageMap) -> Self {
        let mut stats = Self::default();
        let mut hosts = HashSet::new();

        for page in pages.pages() {
            stats.total_pages += 1;
            stats.total_links += page.links.len() as u64;
            *stats.pages_by_depth.entry(page.depth).or_default() += 1;

            if let Some(status) = page.status {
                *stats.pages_by_status.entry(status).or_default() += 1;
            }
            if page.is_success() {
                stats.successful_pages += 1;
            }
            if page.is_redirect() {
                stats.redirects += 1;
            }
            if page.not_found() {
                stats.not_found += 1;
            }
            if let Some(error) = &page.fetch_error {
                *stats.error_summary.entry(error_kind(error)).or_default() += 1;
            }
            if let Some(host) = host_of(&page.url) {
                hosts.insert(host);
            }
        }

        stats.unique_hosts = hosts.len() as u64;
        stats
    }

    /// Deepest page depth, `None` for an empty crawl
    pub fn max_depth(&self) -> Option<u32> {
        self.pages_by_depth.keys().next_back().copied()
    }

    pub fn total_errors(&self) -> u64 {
        self.error_summary.values().sum()
    }
}

fn error_kind(error: &FetchError) -> &'static str {
    match error {
        FetchError::Timeout => "timeout",
        FetchError::Connect(_) => "connect",
        FetchError::Body(_) => "body",
        FetchError::NotHtml { .. } => "not-html",
        FetchError::Other(_) => "other",
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages: {}", stats.total_pages);
    println!("  Unique hosts: {}", stats.unique_hosts);
    println!("  Total links found: {}", stats.total_links);
    println!("  Redirects: {}", stats.redirects);
    println!("  Not found: {}", stats.not_found);
    if let Some(depth) = stats.max_depth() {
        println!("  Max depth: {}", depth);
    }
    println!();

    println!("Pages by Depth:");
    for (depth, count) in &stats.pages_by_depth {
        println!("  {}: {}", depth, count);
    }
    println!();

    if !stats.pages_by_status.is_empty() {
        println!("Pages by Status:");
        for (status, count) in &stats.pages_by_status {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    if !stats.error_summary.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    let success_rate = if stats.total_pages > 0 {
        (stats.successful_pages as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched successfully)",
        success_rate, stats.successful_pages, stats.total_pages
    );
}
