//! Interception and proxy engine.
//!
//! Per request:
//! ```text
//! RECEIVED → FORWARDING → RESPONSE_CAPTURED → (HANDLING →)? RELEASED
//! ```
//! Requests without an intercept route stream straight through. Intercepted
//! requests buffer the upstream body, run the bound handler inside the
//! isolation guard, then release the same status, headers and bytes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};

use crate::http::response::release;
use crate::intercept::forward::Forwarder;
use crate::intercept::guard::run_guarded;
use crate::intercept::handler::InterceptContext;
use crate::notify::Notifier;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Which registration served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Proxy,
    Intercept,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Proxy => "proxy",
            Mode::Intercept => "intercept",
        }
    }
}

/// Shared, read-only request processor.
#[derive(Debug, Clone)]
pub struct InterceptEngine {
    routes: Arc<RouteTable>,
    forwarder: Forwarder,
    notifier: Arc<Notifier>,
    handler_timeout: Duration,
}

impl InterceptEngine {
    pub fn new(
        routes: RouteTable,
        forwarder: Forwarder,
        notifier: Arc<Notifier>,
        handler_timeout: Duration,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            forwarder,
            notifier,
            handler_timeout,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Notifier shared by every handler in the route table.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Process one inbound request to completion.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let matched = self.routes.match_request(&method, &path);
        let mode = if matched.is_some() { Mode::Intercept } else { Mode::Proxy };

        match mode {
            Mode::Proxy => tracing::info!(method = %method, path = %path, "PROXY"),
            Mode::Intercept => tracing::info!(method = %method, path = %path, "INTERCEPT"),
        }

        let upstream = match self.forwarder.forward(request).await {
            Ok(upstream) => upstream,
            Err(e) => {
                tracing::error!(method = %method, path = %path, error = %e, "Upstream error");
                metrics::record_request(mode.as_str(), e.status().as_u16(), start);
                return e.into_response();
            }
        };

        let status = upstream.status();
        let headers = upstream.headers().clone();

        let Some(matched) = matched else {
            metrics::record_request(mode.as_str(), status.as_u16(), start);
            return release(status, &headers, Body::from_stream(upstream.bytes_stream()));
        };

        let body = match self.forwarder.capture(upstream).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(method = %method, path = %path, error = %e, "Failed to read upstream body");
                metrics::record_request(mode.as_str(), e.status().as_u16(), start);
                return e.into_response();
            }
        };

        let ctx = InterceptContext {
            method: &method,
            path: &path,
            params: &matched.params,
            status,
            headers: &headers,
            body: &body,
        };
        run_guarded(matched.route.handler.as_ref(), &ctx, self.handler_timeout).await;

        metrics::record_request(mode.as_str(), status.as_u16(), start);
        release(status, &headers, Body::from(body))
    }
}
