//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk crawler.

use anyhow::Context;
use clap::Parser;
use sitewalk::config::{compute_config_hash, read_config, Config};
use sitewalk::crawler::{Coordinator, CrawlConfiguration};
use sitewalk::output::{print_pages, print_statistics, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitewalk: a polite, concurrent site crawler
///
/// Sitewalk crawls every page reachable from the seed URLs without leaving
/// their hosts, optionally respecting robots.txt, a depth limit and a delay
/// between requests, and prints the pages it found.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version)]
#[command(about = "A polite, concurrent site crawler", long_about = None)]
struct Cli {
    /// Seed URLs to start from (added to any listed in the config file)
    #[arg(value_name = "URL")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seconds each worker waits before every request
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Respect robots.txt
    #[arg(long)]
    obey_robots_txt: bool,

    /// Drop page bodies once links are extracted
    #[arg(long)]
    discard_page_bodies: bool,

    /// Do not follow links deeper than this
    #[arg(long, value_name = "DEPTH")]
    depth_limit: Option<u32>,

    /// User-Agent header and robots.txt identity
    #[arg(long, value_name = "AGENT")]
    user_agent: Option<String>,

    /// Number of concurrent fetch workers
    #[arg(short, long, value_name = "N")]
    workers: Option<u32>,

    /// Skip links whose path matches this regex (repeatable)
    #[arg(long, value_name = "REGEX")]
    skip_links_like: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate options and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Merges command-line options over the config file (or defaults)
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                let config = read_config(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                let hash = compute_config_hash(path)?;
                tracing::info!("Configuration loaded successfully (hash: {})", hash);
                config
            }
            None => Config::default(),
        };

        config.seeds.extend(self.seeds);

        let crawler = &mut config.crawler;
        if let Some(delay) = self.delay {
            crawler.delay = delay;
        }
        if self.obey_robots_txt {
            crawler.obey_robots_txt = true;
        }
        if self.discard_page_bodies {
            crawler.discard_page_bodies = true;
        }
        if self.depth_limit.is_some() {
            crawler.depth_limit = self.depth_limit;
        }
        if let Some(user_agent) = self.user_agent {
            crawler.user_agent = user_agent;
        }
        if let Some(workers) = self.workers {
            crawler.workers = workers;
        }
        crawler.skip_links_like.extend(self.skip_links_like);

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let dry_run = cli.dry_run;
    let quiet = cli.quiet;
    let config = cli.into_config()?;

    let crawl_config = match CrawlConfiguration::from_config(&config) {
        Ok(crawl_config) => crawl_config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    if dry_run {
        handle_dry_run(&crawl_config);
        return Ok(());
    }

    handle_crawl(crawl_config, quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            2 => EnvFilter::new("sitewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective options and seeds
fn handle_dry_run(config: &CrawlConfiguration) {
    let options = config.options();

    println!("=== Sitewalk Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", options.workers);
    println!("  Delay: {}s", options.delay);
    println!("  Obey robots.txt: {}", options.obey_robots_txt);
    println!("  Discard page bodies: {}", options.discard_page_bodies);
    match options.depth_limit {
        Some(limit) => println!("  Depth limit: {}", limit),
        None => println!("  Depth limit: none"),
    }
    println!("  Redirect limit: {}", options.redirect_limit);
    println!("  Timeout: {}s", options.timeout);
    println!("  User agent: {}", options.user_agent);

    println!("\nSkip Patterns ({}):", config.skip_patterns().len());
    for pattern in config.skip_patterns() {
        println!("  - {}", pattern);
    }

    println!("\nSeeds ({}):", config.seeds().len());
    for seed in config.seeds() {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfiguration, quiet: bool) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;

    // Ctrl-C finishes in-flight pages and reports what was crawled so far
    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing in-flight pages");
            stop.stop();
        }
    });

    let pages = match coordinator.run().await {
        Ok(pages) => pages,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !quiet {
        print_pages(&pages);
        println!();
        print_statistics(&CrawlStatistics::from_pages(&pages));
    }

    Ok(())
}
