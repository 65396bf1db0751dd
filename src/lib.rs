//! Sitewalk: a polite, concurrent site crawler
//!
//! This crate discovers and fetches every page reachable from a set of seed
//! URLs within a crawl policy (domain containment, depth limit, link filters,
//! robots.txt, request pacing) and returns a deduplicated page graph.
//!
//! # Example
//!
//! ```no_run
//! use sitewalk::config::CrawlerConfig;
//! use sitewalk::crawler::{crawl, CrawlConfiguration};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = CrawlConfiguration::new(["https://example.com/"], CrawlerConfig::default())?;
//! config.skip_links_like(regex::Regex::new(r"\.pdf$")?);
//! config.on_every_page(|page| {
//!     println!("{} (depth {})", page.url, page.depth);
//!     Ok(())
//! });
//!
//! let pages = crawl(config).await?;
//! println!("{} pages", pages.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Sitewalk operations
#[derive(Debug, Error)]
pub enum SitewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page hook failed for {url}: {source}")]
    Hook {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("After-crawl hook failed: {0}")]
    AfterCrawl(#[source] anyhow::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid link pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitewalk operations
pub type Result<T> = std::result::Result<T, SitewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlerConfig};
pub use crawler::{crawl, Coordinator, CrawlConfiguration, StopHandle};
pub use page::{FetchError, Page, PageMap};
pub use crate::url::{canonicalize, host_of, normalize_url};
