//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::observability::LogFormat;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Upstream target.
    pub upstream: UpstreamConfig,

    /// Raw route mapping document: a flat JSON array of
    /// `method, path, message` triples.
    pub mappings: Option<String>,

    /// Chat webhook settings.
    pub notifications: NotificationConfig,

    /// Intercept handler settings.
    pub intercept: InterceptConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Listening port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn socket_address(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every request is forwarded to (required).
    pub target_url: Option<String>,

    /// Deadline for the upstream response (head and, when intercepting, body)
    /// in seconds.
    pub timeout_secs: u64,

    /// Largest inbound request body forwarded, in bytes.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target_url: None,
            timeout_secs: 30,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Chat webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Webhook URL messages are posted to.
    pub webhook_url: Option<String>,

    /// Default channel; `#` is prepended unless already present.
    pub channel: Option<String>,

    /// Default username.
    pub username: Option<String>,

    /// Default icon emoji (e.g., ":robot_face:").
    pub icon_emoji: Option<String>,

    /// Log payloads instead of sending them.
    pub disabled: bool,

    /// Webhook request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            channel: None,
            username: None,
            icon_emoji: None,
            disabled: false,
            timeout_secs: 10,
        }
    }
}

/// Intercept handler configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InterceptConfig {
    /// Longest a handler may hold a response before it is released anyway.
    pub handler_timeout_ms: u64,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            handler_timeout_ms: 5_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Log filter directive (e.g., "hook_proxy=debug").
    pub log_filter: Option<String>,

    /// Prometheus listener address; metrics are off when unset.
    pub metrics_address: Option<String>,
}
