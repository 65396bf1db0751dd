//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through the [`Transport`] seam
//! - HTML link extraction
//! - The shared frontier and visited set
//! - The link filter chain and user hooks
//! - The worker pool and overall crawl coordination

mod configuration;
mod coordinator;
mod fetcher;
mod filter;
mod frontier;
mod hooks;
mod parser;
#[cfg(test)]
pub(crate) mod testing;
mod worker;

pub use configuration::CrawlConfiguration;
pub use coordinator::{crawl, crawl_with_transport, Coordinator, StopHandle};
pub use fetcher::{build_http_client, fetch_url, HttpTransport, Response, Transport};
pub use filter::{LinkFilter, Rejection};
pub use frontier::{Frontier, FrontierEntry, Lease};
pub use hooks::{AfterCrawlCallback, BadLinkCallback, FocusSelector, PageCallback};
pub use parser::{extract_links, ExtractedLinks};
