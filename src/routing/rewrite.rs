//! Upstream URL rewriting.
//!
//! # Responsibilities
//! - Join the upstream base path with the inbound request path
//! - Carry the inbound query string through untouched
//!
//! # Design Decisions
//! - Pure function, no I/O
//! - Exactly one separator at the join point
//! - Inbound paths with `.`/`..` segments, plain or percent-encoded, are
//!   rejected: URL normalization would resolve them above the base path
//! - The base URL's own query and fragment are never forwarded

use axum::http::Uri;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path '{0}' contains a dot segment")]
pub struct DotSegment(pub String);

/// Build the upstream URL for an inbound request URI.
///
/// `base` supplies scheme, authority and the path prefix. The inbound path is
/// appended below that prefix and the inbound query is copied verbatim.
pub fn rewrite_url(base: &Url, inbound: &Uri) -> Result<Url, DotSegment> {
    let path = inbound.path();
    if path.split('/').any(is_dot_segment) {
        return Err(DotSegment(path.to_string()));
    }

    let mut url = base.clone();
    url.set_path(&join_paths(base.path(), path));
    url.set_query(inbound.query());
    url.set_fragment(None);
    Ok(url)
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Join two URL paths with a single `/` between them.
pub fn join_paths(base: &str, path: &str) -> String {
    let prefix = base.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    let mut joined = String::with_capacity(prefix.len() + suffix.len() + 1);
    joined.push_str(prefix);
    joined.push('/');
    joined.push_str(suffix);
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(base: &str, inbound: &str) -> String {
        let base = Url::parse(base).unwrap();
        let inbound: Uri = inbound.parse().unwrap();
        rewrite_url(&base, &inbound).unwrap().to_string()
    }

    #[test]
    fn test_join_under_base_path() {
        assert_eq!(join_paths("/api", "/users/5"), "/api/users/5");
        assert_eq!(join_paths("/api/", "/users/5"), "/api/users/5");
        assert_eq!(join_paths("/api", "users/5"), "/api/users/5");
    }

    #[test]
    fn test_join_under_root() {
        assert_eq!(join_paths("/", "/x"), "/x");
        assert_eq!(join_paths("", "/x"), "/x");
        assert_eq!(join_paths("/", "/"), "/");
    }

    #[test]
    fn test_trailing_slash_is_kept() {
        assert_eq!(join_paths("/api", "/"), "/api/");
        assert_eq!(join_paths("/api", "/users/"), "/api/users/");
    }

    #[test]
    fn test_rewrite_keeps_query() {
        assert_eq!(
            rewrite("http://backend:8080/api", "/users/5?expand=true&x=%20y"),
            "http://backend:8080/api/users/5?expand=true&x=%20y"
        );
    }

    #[test]
    fn test_rewrite_root_base_is_identity() {
        assert_eq!(rewrite("https://backend.example.com", "/x"), "https://backend.example.com/x");
        assert_eq!(rewrite("https://backend.example.com/", "/x?a=1"), "https://backend.example.com/x?a=1");
    }

    #[test]
    fn test_rewrite_drops_base_query() {
        assert_eq!(rewrite("http://backend/api?token=1", "/ping"), "http://backend/api/ping");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let base = Url::parse("http://backend/api").unwrap();

        for inbound in ["/%2e%2e/secret", "/%2E%2e/secret", "/a/../b", "/.%2e", "/./x"] {
            let uri: Uri = inbound.parse().unwrap();
            assert_eq!(
                rewrite_url(&base, &uri),
                Err(DotSegment(inbound.to_string())),
                "path {}",
                inbound
            );
        }
    }

    #[test]
    fn test_dots_inside_segments_are_kept() {
        assert_eq!(rewrite("http://backend/api", "/a..b/.well-known/..."), "http://backend/api/a..b/.well-known/...");
    }
}
