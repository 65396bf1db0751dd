//! URL handling module for Sitewalk
//!
//! This module provides canonicalization (the dedup key of the crawl) and
//! host extraction for domain containment.

mod domain;
mod normalize;

pub use domain::{host_of, robots_url};
pub use normalize::{canonicalize, normalize_url};

use std::collections::HashSet;
use url::Url;

/// Returns true if the host of `url` is one of `hosts`
///
/// `hosts` are expected to come from [`host_of`], so they are already lowercase.
pub fn is_within_hosts(url: &Url, hosts: &HashSet<String>) -> bool {
    host_of(url).is_some_and(|host| hosts.contains(&host))
}
