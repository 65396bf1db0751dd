//! Output module for reporting crawl results
//!
//! This module handles:
//! - Recording crawl statistics derived from the page map
//! - Printing a per-page listing of the crawl

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use crate::page::PageMap;

/// Prints one line per page, ordered by depth then URL
///
/// Each line shows depth, status (or the fetch error) and the URL, plus the
/// redirect target for redirects.
pub fn print_pages(pages: &PageMap) {
    let mut sorted: Vec<_> = pages.pages().collect();
    sorted.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| a.url.as_str().cmp(b.url.as_str()))
    });

    for page in sorted {
        let outcome = match (&page.fetch_error, page.status) {
            (Some(error), _) => format!("error: {}", error),
            (None, Some(status)) => status.to_string(),
            (None, None) => "-".to_string(),
        };
        match &page.redirected_to {
            Some(target) => println!("{:>3} {} {} -> {}", page.depth, outcome, page.url, target),
            None => println!("{:>3} {} {}", page.depth, outcome, page.url),
        }
    }
}
