//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the inbound URI onto the upstream target
//! - Forward method, headers and body as received
//! - Map transport failures to the status the client sees
//!
//! # Design Decisions
//! - One attempt per request, no retries
//! - Upstream redirects are relayed to the client, never followed
//! - `host` and hop-by-hop headers are regenerated for the upstream leg
//! - The client adds `accept: */*` when the inbound request carries no
//!   `accept`; an inbound `accept` is forwarded as sent

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use thiserror::Error;
use url::Url;

use crate::http::response::filter_headers;
use crate::resilience::timeouts::{with_timeout, TimedOut};
use crate::routing::{rewrite_url, DotSegment};

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("failed to read request body: {0}")]
    RequestBody(String),

    #[error(transparent)]
    Path(#[from] DotSegment),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("upstream request {0}")]
    Timeout(TimedOut),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ForwardError::RequestBody(_) | ForwardError::Path(_) => StatusCode::BAD_REQUEST,
            ForwardError::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let message = match &self {
            ForwardError::PayloadTooLarge(_) => "Request body too large",
            ForwardError::RequestBody(_) => "Failed to read request body",
            ForwardError::Path(_) => "Invalid request path",
            _ if self.status() == StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
            _ => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}

/// Forwards requests to the single upstream target.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: Url,
    timeout: Duration,
    max_body_bytes: usize,
}

impl Forwarder {
    pub fn new(upstream: Url, timeout: Duration, max_body_bytes: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            upstream,
            timeout,
            max_body_bytes,
        })
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` upstream and wait for the response head.
    pub async fn forward(&self, request: Request<Body>) -> Result<reqwest::Response, ForwardError> {
        let (parts, body) = request.into_parts();
        let url = rewrite_url(&self.upstream, &parts.uri)?;
        let body = self.read_body(body).await?;
        let headers = filter_headers(&parts.headers, |name| {
            *name == header::HOST || *name == header::CONTENT_LENGTH
        });

        tracing::debug!(upstream_url = %url, body_bytes = body.len(), "Forwarding to upstream");

        let send = self
            .client
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send();

        with_timeout(self.timeout, send)
            .await
            .map_err(ForwardError::Timeout)?
            .map_err(ForwardError::Upstream)
    }

    /// Buffer the whole upstream response body.
    pub async fn capture(&self, response: reqwest::Response) -> Result<Bytes, ForwardError> {
        with_timeout(self.timeout, response.bytes())
            .await
            .map_err(ForwardError::Timeout)?
            .map_err(ForwardError::Upstream)
    }

    async fn read_body(&self, body: Body) -> Result<Bytes, ForwardError> {
        Limited::new(body, self.max_body_bytes)
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    ForwardError::PayloadTooLarge(self.max_body_bytes)
                } else {
                    ForwardError::RequestBody(e.to_string())
                }
            })
    }
}
