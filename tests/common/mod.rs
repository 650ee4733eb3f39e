//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use axum::Router;
use tokio::net::TcpListener;

use hook_proxy::config::ProxyConfig;
use hook_proxy::lifecycle::{build_server, Shutdown};

/// A request as seen by a mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

/// Start a programmable mock server on an ephemeral port. Every request is
/// recorded and answered by `respond`.
pub async fn start_programmable_backend<F>(respond: F) -> (SocketAddr, Log)
where
    F: Fn(&Recorded) -> Response<Body> + Send + Sync + 'static,
{
    let log: Log = Arc::default();
    let respond = Arc::new(respond);

    let recorder = log.clone();
    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorder = recorder.clone();
        let respond = respond.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
            let recorded = Recorded {
                method: parts.method,
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body,
            };
            let response = respond(&recorded);
            recorder.lock().unwrap().push(recorded);
            response
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, log)
}

/// Start a mock backend that returns a fixed response.
#[allow(dead_code)]
pub async fn start_mock_backend(status: StatusCode, body: &'static str) -> (SocketAddr, Log) {
    start_programmable_backend(move |_| respond(status, body)).await
}

/// Start a mock chat webhook answering every POST with `status`.
#[allow(dead_code)]
pub async fn start_webhook(status: StatusCode) -> (SocketAddr, Log) {
    start_programmable_backend(move |_| respond(status, "ok")).await
}

pub fn respond(status: StatusCode, body: &'static str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("x-upstream", "mock")
        .body(Body::from(body))
        .unwrap()
}

/// Proxy configuration pointing at `upstream`, notifications enabled.
pub fn proxy_config(upstream: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.target_url = Some(upstream.to_string());
    config.upstream.timeout_secs = 5;
    config
}

/// Build and run the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let server = build_server(config).expect("valid proxy configuration");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that neither follows redirects nor uses system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Poll `check` for up to two seconds.
#[allow(dead_code)]
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

/// Number of requests recorded so far.
#[allow(dead_code)]
pub fn hits(log: &Log) -> usize {
    log.lock().unwrap().len()
}

/// JSON bodies recorded so far.
#[allow(dead_code)]
pub fn json_bodies(log: &Log) -> Vec<serde_json::Value> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|r| serde_json::from_slice(&r.body).ok())
        .collect()
}
