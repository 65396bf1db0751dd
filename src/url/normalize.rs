use crate::UrlError;
use url::Url;

/// Parses an absolute URL into its canonical crawl form
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Only `http` and `https` are accepted
/// 3. A host is required
/// 4. Remove the fragment (everything after #)
///
/// The query string is kept verbatim: `/1?foo=1` and `/1` are different pages.
/// Host lowercasing, default-port removal and dot-segment resolution are done
/// by the URL parser itself.
///
/// # Examples
///
/// ```
/// use sitewalk::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.com:80/a/../page?x=1#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page?x=1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    finish(url)
}

/// Resolves a link found on `base` into its canonical absolute form
///
/// Relative references are resolved against `base` first, then the result
/// goes through the same steps as [`normalize_url`].
///
/// # Examples
///
/// ```
/// use sitewalk::url::canonicalize;
/// use url::Url;
///
/// let base = Url::parse("http://example.com/dir/page").unwrap();
/// let url = canonicalize("other?q=2#frag", &base).unwrap();
/// assert_eq!(url.as_str(), "http://example.com/dir/other?q=2");
/// ```
pub fn canonicalize(href: &str, base: &Url) -> Result<Url, UrlError> {
    let url = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    finish(url)
}

fn finish(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}
