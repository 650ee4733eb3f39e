//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the mapping table, notifier, forwarder and engine in order
//! - Start background tasks (metrics)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before binding
//! - A malformed mapping document is not a startup error (passthrough only)
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use url::Url;

use crate::config::{validate_config, ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::intercept::{build_routes, Forwarder, InterceptEngine};
use crate::lifecycle::{signals::shutdown_signal, Shutdown};
use crate::notify::{Notifier, NotifierSettings, NotifyError};
use crate::observability::metrics;
use crate::routing::{build_rules, MappingError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Notifier(#[from] NotifyError),

    #[error("invalid target URL: {0}")]
    Target(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics listener: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build a ready-to-run server from a resolved configuration.
pub fn build_server(config: ProxyConfig) -> Result<HttpServer, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let rules = build_rules(config.mappings.as_deref())?;

    let settings = NotifierSettings::from_config(&config.notifications)?;
    if settings.disabled {
        tracing::info!("Notification transport disabled, payloads will be logged");
    } else if settings.webhook_url.is_none() {
        tracing::warn!("No webhook URL configured, notifications will fail");
    }
    let notifier = Arc::new(Notifier::new(settings)?);

    let routes = build_routes(&rules, Arc::clone(&notifier));

    let target = Url::parse(config.upstream.target_url.as_deref().unwrap_or_default().trim())?;
    let forwarder = Forwarder::new(
        target,
        Duration::from_secs(config.upstream.timeout_secs),
        config.upstream.max_body_bytes,
    )?;

    tracing::info!(
        target_url = %forwarder.upstream(),
        routes = routes.len(),
        "Configuration loaded"
    );

    let engine = InterceptEngine::new(
        routes,
        forwarder,
        notifier,
        Duration::from_millis(config.intercept.handler_timeout_ms),
    );

    Ok(HttpServer::new(config, engine))
}

/// Start the proxy and serve until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    let server = build_server(config)?;

    if let Some(address) = server.config().observability.metrics_address.as_deref() {
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(address.to_string()))?;
        metrics::init_metrics(addr)?;
    }

    let address = server.config().listener.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await.map_err(StartupError::Serve)
}
