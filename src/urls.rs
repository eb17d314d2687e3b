use url::Url;

/// Canonical form of an article URL, used as the dedup key: fragment and
/// query string removed, trailing slashes trimmed.
pub fn canonicalize(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    without_query.trim_end_matches('/').to_string()
}

/// Resolve an href against a source's base URL. Absolute http(s) hrefs pass
/// through; site-relative paths are joined; anything else is skipped.
pub fn resolve(base: &Url, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with('/') {
        base.join(href).ok().map(|u| u.to_string())
    } else {
        None
    }
}
