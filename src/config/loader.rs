//! Configuration loading from disk, flags and environment.

use std::fs;
use std::path::{Path, PathBuf};

use clap::builder::BoolishValueParser;
use clap::ArgAction;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::observability::LogFormat;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load a configuration file without validating it.
pub fn load_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = load_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Settings accepted on the command line or through the environment.
/// Any value given here overrides the configuration file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// TOML configuration file.
    #[arg(long, env = "HOOK_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Upstream base URL every request is forwarded to.
    #[arg(long, env = "TARGET_URL")]
    pub target_url: Option<String>,

    /// Flat JSON array of method, path, message triples.
    #[arg(long, env = "MAPPINGS")]
    pub mappings: Option<String>,

    /// Chat webhook URL.
    #[arg(long, env = "SLACK_URL")]
    pub webhook_url: Option<String>,

    /// Default channel for notifications.
    #[arg(long, env = "SLACK_CHANNEL")]
    pub channel: Option<String>,

    /// Default username for notifications.
    #[arg(long, env = "SLACK_USERNAME")]
    pub username: Option<String>,

    /// Default icon emoji for notifications.
    #[arg(long, env = "SLACK_ICON_EMOJI")]
    pub icon_emoji: Option<String>,

    /// Log notification payloads instead of sending them.
    #[arg(long, env = "DISABLE_SLACK", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub disable_notifications: Option<bool>,

    /// Listening port.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Listening address.
    #[arg(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Upstream response deadline in seconds.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Webhook request deadline in seconds.
    #[arg(long, env = "WEBHOOK_TIMEOUT_SECS")]
    pub webhook_timeout_secs: Option<u64>,

    /// Intercept handler deadline in milliseconds.
    #[arg(long, env = "HANDLER_TIMEOUT_MS")]
    pub handler_timeout_ms: Option<u64>,

    /// Largest request body forwarded upstream, in bytes.
    #[arg(long, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log filter directive.
    #[arg(long, env = "LOG_FILTER")]
    pub log_filter: Option<String>,

    /// Prometheus listener address (e.g., "0.0.0.0:9090").
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

impl ConfigArgs {
    /// Resolve file + overrides without validating.
    pub fn resolve(&self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_file(path)?,
            None => ProxyConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Resolve and validate.
    pub fn load(&self) -> Result<ProxyConfig, ConfigError> {
        let config = self.resolve()?;
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay every value set here onto `config`.
    pub fn apply(&self, config: &mut ProxyConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set_opt(&mut config.upstream.target_url, &self.target_url);
        set_opt(&mut config.mappings, &self.mappings);
        set_opt(&mut config.notifications.webhook_url, &self.webhook_url);
        set_opt(&mut config.notifications.channel, &self.channel);
        set_opt(&mut config.notifications.username, &self.username);
        set_opt(&mut config.notifications.icon_emoji, &self.icon_emoji);
        set(&mut config.notifications.disabled, &self.disable_notifications);
        set(&mut config.listener.port, &self.port);
        set(&mut config.listener.bind_address, &self.bind_address);
        set(&mut config.upstream.timeout_secs, &self.upstream_timeout_secs);
        set(&mut config.notifications.timeout_secs, &self.webhook_timeout_secs);
        set(&mut config.intercept.handler_timeout_ms, &self.handler_timeout_ms);
        set(&mut config.upstream.max_body_bytes, &self.max_body_bytes);
        set(&mut config.observability.log_format, &self.log_format);
        set_opt(&mut config.observability.log_filter, &self.log_filter);
        set_opt(&mut config.observability.metrics_address, &self.metrics_address);
    }
}
