//! Transparent reverse proxy with webhook notifications.
//!
//! Every inbound request is forwarded to one upstream target. Requests that
//! match a configured (method, path) route additionally trigger a chat
//! notification built from the captured upstream response, without changing
//! what the client receives.

pub mod config;
pub mod forms;
pub mod http;
pub mod intercept;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
