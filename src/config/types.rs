use serde::Deserialize;

/// Default number of concurrent fetch workers
pub const DEFAULT_WORKERS: u32 = 4;

/// Default maximum number of redirect hops followed from one frontier entry
pub const DEFAULT_REDIRECT_LIMIT: u32 = 10;

/// Default per-fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for a Sitewalk config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// URLs the crawl starts from
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Seconds each worker waits before issuing a request
    pub delay: f64,

    /// Whether to consult robots.txt before following a link
    #[serde(rename = "obey-robots-txt")]
    pub obey_robots_txt: bool,

    /// Drop page bodies once links have been extracted
    #[serde(rename = "discard-page-bodies")]
    pub discard_page_bodies: bool,

    /// Maximum depth from the seeds; unlimited when absent
    #[serde(rename = "depth-limit")]
    pub depth_limit: Option<u32>,

    /// User-Agent sent with every request and matched against robots.txt
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Number of concurrent fetch workers
    pub workers: u32,

    /// Maximum redirect hops followed from a single frontier entry
    #[serde(rename = "redirect-limit")]
    pub redirect_limit: u32,

    /// Per-fetch timeout in seconds
    pub timeout: u64,

    /// Regular expressions; links whose path matches any of them are not followed
    #[serde(rename = "skip-links-like")]
    pub skip_links_like: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay: 0.0,
            obey_robots_txt: false,
            discard_page_bodies: false,
            depth_limit: None,
            user_agent: format!("sitewalk/{}", env!("CARGO_PKG_VERSION")),
            workers: DEFAULT_WORKERS,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            timeout: DEFAULT_TIMEOUT_SECS,
            skip_links_like: Vec::new(),
        }
    }
}
