//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing)
//! - Attach a request id span to every request
//! - Hand every request to the intercept engine
//! - Serve until the shutdown signal fires, then wait for notifications in flight

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::ProxyConfig;
use crate::http::request::RequestId;
use crate::intercept::InterceptEngine;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InterceptEngine>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    engine: Arc<InterceptEngine>,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server around a ready engine.
    pub fn new(config: ProxyConfig, engine: InterceptEngine) -> Self {
        let engine = Arc::new(engine);
        let state = AppState {
            engine: Arc::clone(&engine),
        };

        let router = Self::build_router(state);
        Self { router, engine, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Method and path dispatch happens inside the engine, so every request
    /// lands on the same handler.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Now listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        let notifier = self.engine.notifier();
        notifier.drain(notifier.settings().timeout).await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    let span = tracing::info_span!("request", request_id = %request_id);

    state.engine.handle(request).instrument(span).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::lifecycle::build_server;

    fn server(target: &str) -> HttpServer {
        let mut config = ProxyConfig::default();
        config.upstream.target_url = Some(target.to_string());
        build_server(config).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let router = server("http://127.0.0.1:1").router();

        let response = router
            .oneshot(Request::builder().uri("/anything?x=1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_root_path_is_routed() {
        let router = server("http://127.0.0.1:1/base").router();

        let response = router
            .oneshot(Request::builder().method("POST").uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_encoded_traversal_is_bad_request() {
        let router = server("http://127.0.0.1:1/api").router();

        let response = router
            .oneshot(Request::builder().uri("/%2e%2e/secret").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
