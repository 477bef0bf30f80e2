use url::Url;

/// Extracts the host from a URL, lowercased
///
/// Returns `None` if the URL has no host, which cannot happen for valid
/// HTTP(S) URLs.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use driftnet::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `host` equals `root_domain` or is a subdomain of it
///
/// The match is a dot-boundary suffix match, so `news.example.com` is within
/// `example.com` but `notexample.com` is not.
pub fn host_within_domain(host: &str, root_domain: &str) -> bool {
    host == root_domain || host.ends_with(&format!(".{}", root_domain))
}
