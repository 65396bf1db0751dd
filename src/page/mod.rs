//! Page records and the page map produced by a crawl
//!
//! # Components
//!
//! - `Page`: one fetched (or failed) resource with its depth/referer bookkeeping
//! - `FetchError`: per-page failure kept inside the record
//! - `PageMap`: canonical URL to `Page`, returned after the crawl drains

mod page_map;
mod record;

pub use page_map::PageMap;
pub use record::{is_html_content_type, FetchError, Page};
