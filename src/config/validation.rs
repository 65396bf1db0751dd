use crate::config::types::{Config, CrawlerConfig};
use crate::url::normalize_url;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    parse_seeds(&config.seeds)?;
    validate_crawler_config(&config.crawler)?;
    compile_skip_patterns(&config.crawler.skip_links_like)?;
    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if !config.delay.is_finite() || config.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.redirect_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "redirect-limit must be >= 1, got {}",
            config.redirect_limit
        )));
    }

    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Parses seed URLs into their canonical form
///
/// Duplicates (after canonicalization) are collapsed, keeping the first
/// occurrence.
pub fn parse_seeds<S: AsRef<str>>(seeds: &[S]) -> Result<Vec<Url>, ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    let mut parsed: Vec<Url> = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let seed = seed.as_ref();
        let url = normalize_url(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
        if !parsed.contains(&url) {
            parsed.push(url);
        }
    }

    Ok(parsed)
}

/// Compiles link skip patterns
pub fn compile_skip_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(pattern)
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
        })
        .collect()
}
