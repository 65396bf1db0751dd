//! Runtime crawl configuration
//!
//! [`CrawlConfiguration`] is built by the caller, hooks are attached to it,
//! and it is then moved into the crawl. Nothing about it can change once the
//! crawl has started.

use crate::config::{compile_skip_patterns, parse_seeds, validate_crawler_config, Config, CrawlerConfig};
use crate::crawler::hooks::Hooks;
use crate::page::{Page, PageMap};
use crate::url::host_of;
use crate::{ConfigResult, UrlError};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Everything a crawl needs: seeds, options, filters and hooks
#[derive(Debug, Clone)]
pub struct CrawlConfiguration {
    seeds: Vec<Url>,
    options: CrawlerConfig,
    skip_patterns: Vec<Regex>,
    hooks: Hooks,
}

impl CrawlConfiguration {
    /// Validates seeds and options into a configuration with no hooks
    ///
    /// Skip patterns listed in `options.skip_links_like` are compiled here.
    pub fn new<I, S>(seeds: I, options: CrawlerConfig) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds: Vec<String> = seeds.into_iter().map(|s| s.as_ref().to_string()).collect();
        let seeds = parse_seeds(&seeds)?;
        validate_crawler_config(&options)?;
        let skip_patterns = compile_skip_patterns(&options.skip_links_like)?;

        Ok(Self {
            seeds,
            options,
            skip_patterns,
            hooks: Hooks::default(),
        })
    }

    /// Builds a configuration from a loaded config file
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Self::new(&config.seeds, config.crawler.clone())
    }

    pub fn seeds(&self) -> &[Url] {
        &self.seeds
    }

    pub fn options(&self) -> &CrawlerConfig {
        &self.options
    }

    pub fn skip_patterns(&self) -> &[Regex] {
        &self.skip_patterns
    }

    pub(crate) fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Hosts of all seeds; links to any other host are not followed
    pub fn seed_hosts(&self) -> HashSet<String> {
        self.seeds.iter().filter_map(host_of).collect()
    }

    /// Pause each worker takes before every request
    pub fn delay(&self) -> Duration {
        // Delays too large for a Duration saturate
        Duration::try_from_secs_f64(self.options.delay).unwrap_or(Duration::MAX)
    }

    /// Per-request timeout handed to the transport
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.options.timeout)
    }

    /// Do not follow links whose path (with query) matches `pattern`
    pub fn skip_links_like(&mut self, pattern: Regex) -> &mut Self {
        self.skip_patterns.push(pattern);
        self
    }

    /// Choose which links to follow from each page
    ///
    /// The selector receives the page (with its extracted links) and its result
    /// replaces `page.links` as the candidate set. Domain, skip, depth and
    /// robots filtering still apply to whatever it returns.
    pub fn focus_crawl<F>(&mut self, selector: F) -> &mut Self
    where
        F: Fn(&Page) -> Vec<Url> + Send + Sync + 'static,
    {
        self.hooks.focus = Some(Arc::new(selector));
        self
    }

    /// Run `callback` on every page; an `Err` aborts the crawl
    pub fn on_every_page<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Page) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.on_every_page.push(Arc::new(callback));
        self
    }

    /// Run `callback` on pages whose URL matches `pattern`
    pub fn on_pages_like<F>(&mut self, pattern: Regex, callback: F) -> &mut Self
    where
        F: Fn(&Page) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.on_pages_like.push((pattern, Arc::new(callback)));
        self
    }

    /// Be told about links that could not be canonicalized
    pub fn on_bad_link<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Url, &str, &UrlError) + Send + Sync + 'static,
    {
        self.hooks.on_bad_link = Some(Arc::new(callback));
        self
    }

    /// Run `callback` once over the finished page map
    pub fn after_crawl<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&PageMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.after_crawl.push(Arc::new(callback));
        self
    }
}
