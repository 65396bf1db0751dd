use url::Url;

/// Extracts the host from a URL for domain-containment checks
///
/// The port is not part of the result, so `example.com:8080` and
/// `example.com` are the same domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitewalk::url::host_of;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(host_of(&url), Some("example.com".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the `robots.txt` location for the origin of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    if !url.has_host() {
        return None;
    }
    url.join("/robots.txt").ok()
}
