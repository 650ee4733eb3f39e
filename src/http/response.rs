//! Response handling.
//!
//! # Responsibilities
//! - Release the upstream response to the client (status, headers, body)
//! - Strip hop-by-hop headers in both directions
//!
//! # Design Decisions
//! - Payload and status are never altered
//! - Plain proxy responses stream; intercepted responses are already buffered
//! - Content encoding is left untouched (no decompression on either leg)

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, Response, StatusCode};

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

/// Whether `name` is connection-specific.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || *name == header::UPGRADE || name.as_str() == "keep-alive"
}

/// Copy `headers`, skipping hop-by-hop entries and anything `skip` selects.
pub fn filter_headers(headers: &HeaderMap, skip: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if is_hop_by_hop(name) || skip(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Build the client response from the upstream status, headers and body.
pub fn release(status: StatusCode, headers: &HeaderMap, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = filter_headers(headers, |_| false);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_hop_by_hop_headers_are_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let filtered = filter_headers(&headers, |_| false);

        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered.get_all(header::SET_COOKIE).iter().count(), 2);
        assert!(filtered.get(header::CONNECTION).is_none());
        assert!(filtered.get("keep-alive").is_none());
    }

    #[test]
    fn test_release_keeps_status() {
        let mut headers = HeaderMap::new();
        headers.insert("x-upstream", HeaderValue::from_static("yes"));

        let response = release(StatusCode::IM_A_TEAPOT, &headers, Body::empty());

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()["x-upstream"], "yes");
    }
}
