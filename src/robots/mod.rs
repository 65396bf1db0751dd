//! Robots.txt fetching, parsing and per-origin caching

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::{product_token, ParsedRobots};

use crate::crawler::Transport;
use crate::url::{canonicalize, robots_url};
use url::Url;

/// Redirect hops followed for a single robots.txt
const ROBOTS_REDIRECT_LIMIT: usize = 5;

/// Fetches robots.txt for the origin of `url`
///
/// Redirects are followed for up to five hops and the final
/// 2xx body is parsed. Never fails: a missing file (4xx), a server error, a
/// redirect chain that is too long or unusable, or a transport error all
/// yield [`ParsedRobots::allow_all`].
pub async fn fetch_robots(transport: &dyn Transport, url: &Url) -> ParsedRobots {
    let Some(robots) = robots_url(url) else {
        return ParsedRobots::allow_all();
    };

    let mut current = robots.clone();
    for _ in 0..=ROBOTS_REDIRECT_LIMIT {
        tracing::debug!("Fetching robots.txt: {}", current);
        let response = match transport.fetch(&current).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}, allowing all", current, e);
                return ParsedRobots::allow_all();
            }
        };

        if (200..300).contains(&response.status) {
            return ParsedRobots::from_content(&response.body);
        }

        let location = response.location().filter(|_| response.is_redirect());
        if let Some(location) = location {
            match canonicalize(location, &current) {
                Ok(next) => {
                    tracing::debug!("robots.txt at {} redirects to {}", current, next);
                    current = next;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        "robots.txt at {} has a bad redirect: {}, allowing all",
                        current,
                        e
                    );
                    return ParsedRobots::allow_all();
                }
            }
        }

        if response.status >= 500 {
            tracing::warn!(
                "robots.txt at {} returned HTTP {}, allowing all",
                current,
                response.status
            );
        } else {
            tracing::debug!(
                "robots.txt at {} returned HTTP {}, allowing all",
                current,
                response.status
            );
        }
        return ParsedRobots::allow_all();
    }

    tracing::warn!(
        "robots.txt at {} redirected more than {} times, allowing all",
        robots,
        ROBOTS_REDIRECT_LIMIT
    );
    ParsedRobots::allow_all()
}
