//! Chat notification dispatch.
//!
//! # Responsibilities
//! - Merge call-site options over the configured defaults
//! - Log the payload instead of sending it when the transport is disabled
//! - POST the payload to the webhook, once, without retries
//! - Swallow and log every transport failure
//!
//! # Design Decisions
//! - The webhook client is built once and shared (connection reuse only)
//! - `notify` never waits on the network; `send` does and reports the outcome
//! - Spawned deliveries are tracked so shutdown can wait for them (`drain`)
//! - Nothing here returns an error to the request path

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::task::JoinSet;
use url::Url;

use crate::config::NotificationConfig;
use crate::notify::payload::{normalize_channel, MessageOptions, NotificationPayload};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

/// Errors raised while building a notifier.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid webhook URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build webhook client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Transport disabled; the serialized payload was logged.
    Suppressed { payload: String },
    /// The webhook accepted the payload.
    Delivered { status: StatusCode },
    /// The payload could not be delivered; the reason was logged.
    Failed { error: String },
}

impl Delivery {
    fn label(&self) -> &'static str {
        match self {
            Delivery::Suppressed { .. } => "suppressed",
            Delivery::Delivered { .. } => "delivered",
            Delivery::Failed { .. } => "failed",
        }
    }
}

/// Process-wide notification settings, resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct NotifierSettings {
    pub webhook_url: Option<Url>,
    pub defaults: MessageOptions,
    pub disabled: bool,
    pub timeout: Duration,
}

impl NotifierSettings {
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotifyError> {
        let webhook_url = config
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| {
                Url::parse(u).map_err(|source| NotifyError::InvalidUrl {
                    url: u.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            webhook_url,
            defaults: MessageOptions {
                channel: config.channel.as_deref().and_then(normalize_channel),
                username: config.username.clone().filter(|u| !u.is_empty()),
                icon_emoji: config.icon_emoji.clone().filter(|i| !i.is_empty()),
            },
            disabled: config.disabled,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

/// Sends chat messages to the configured webhook.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    settings: NotifierSettings,
    pending: Arc<Mutex<JoinSet<()>>>,
}

impl Notifier {
    pub fn new(settings: NotifierSettings) -> Result<Self, NotifyError> {
        let mut builder = reqwest::Client::builder();
        if !settings.timeout.is_zero() {
            builder = builder.timeout(settings.timeout);
        }

        Ok(Self {
            client: builder.build()?,
            settings,
            pending: Arc::default(),
        })
    }

    pub fn settings(&self) -> &NotifierSettings {
        &self.settings
    }

    /// Build the payload for `text`, call-site options over the defaults.
    pub fn payload(&self, text: impl Into<String>, options: MessageOptions) -> NotificationPayload {
        NotificationPayload::new(text, options.or(&self.settings.defaults))
    }

    /// Fire-and-forget dispatch.
    ///
    /// Dry-run payloads are logged before this returns. Otherwise the POST is
    /// spawned onto the runtime and the caller continues immediately.
    pub fn notify(self: &Arc<Self>, text: impl Into<String>, options: MessageOptions) {
        let payload = self.payload(text, options);

        if self.settings.disabled {
            self.suppress(&payload);
            return;
        }

        let notifier = Arc::clone(self);
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            notifier.deliver(&payload).await;
        });
    }

    /// Wait up to `limit` for spawned deliveries to finish. Returns how many
    /// were still running and got dropped.
    pub async fn drain(&self, limit: Duration) -> usize {
        let mut pending = std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        if pending.is_empty() {
            return 0;
        }

        tracing::info!(pending = pending.len(), "Waiting for notifications in flight");
        let _ = with_timeout(limit, async {
            while pending.join_next().await.is_some() {}
        })
        .await;

        let abandoned = pending.len();
        if abandoned > 0 {
            tracing::warn!(abandoned, "Dropping notifications still in flight");
        }
        abandoned
    }

    /// Dispatch and wait for the outcome.
    pub async fn send(&self, text: impl Into<String>, options: MessageOptions) -> Delivery {
        let payload = self.payload(text, options);

        if self.settings.disabled {
            return self.suppress(&payload);
        }

        self.deliver(&payload).await
    }

    fn suppress(&self, payload: &NotificationPayload) -> Delivery {
        let payload = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize notification payload");
                return self.record(Delivery::Failed { error: e.to_string() });
            }
        };

        tracing::info!(payload = %payload, "Notification transport disabled, message not sent");
        self.record(Delivery::Suppressed { payload })
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Delivery {
        let Some(url) = self.settings.webhook_url.clone() else {
            tracing::error!("Notification not sent, no webhook URL configured");
            return self.record(Delivery::Failed {
                error: "no webhook URL configured".to_string(),
            });
        };

        let result = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        let delivery = match result {
            Ok(response) => {
                tracing::info!(status = %response.status(), "Notification was sent");
                Delivery::Delivered {
                    status: response.status(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send notification");
                Delivery::Failed { error: e.to_string() }
            }
        };

        self.record(delivery)
    }

    fn record(&self, delivery: Delivery) -> Delivery {
        metrics::record_notification(delivery.label());
        delivery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::capture_logs;

    fn settings() -> NotifierSettings {
        NotifierSettings {
            webhook_url: None,
            defaults: MessageOptions::default()
                .channel("#general")
                .username("hook-proxy")
                .icon_emoji(":robot_face:"),
            disabled: true,
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_dry_run_logs_payload() {
        let notifier = Notifier::new(settings()).unwrap();

        let Delivery::Suppressed { payload } = notifier.send("hello", MessageOptions::default()).await else {
            panic!("expected a suppressed delivery");
        };

        assert!(payload.contains(r#""text":"hello""#));
        assert!(payload.contains(r##""channel":"#general""##));
    }

    #[tokio::test]
    async fn test_dry_run_logs_exactly_one_payload() {
        let notifier = Notifier::new(settings()).unwrap();
        let (logs, _guard) = capture_logs();

        notifier.send("hello", MessageOptions::default()).await;

        let events = logs.events();
        assert_eq!(events.len(), 1, "events: {:?}", events);
        assert_eq!(events[0]["level"], "INFO");
        let payload = events[0]["fields"]["payload"].as_str().unwrap();
        assert!(payload.contains(r#""text":"hello""#));
    }

    #[tokio::test]
    async fn test_missing_webhook_fails_quietly() {
        let notifier = Notifier::new(NotifierSettings {
            disabled: false,
            ..settings()
        })
        .unwrap();

        let delivery = notifier.send("hello", MessageOptions::default()).await;
        assert!(matches!(delivery, Delivery::Failed { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_webhook_fails_quietly() {
        let notifier = Notifier::new(NotifierSettings {
            disabled: false,
            webhook_url: Some(Url::parse("http://127.0.0.1:1/hook").unwrap()),
            ..settings()
        })
        .unwrap();

        let delivery = notifier.send("hello", MessageOptions::default()).await;
        assert!(matches!(delivery, Delivery::Failed { .. }));
    }

    #[tokio::test]
    async fn test_drain_waits_for_spawned_deliveries() {
        let notifier = Arc::new(
            Notifier::new(NotifierSettings {
                disabled: false,
                webhook_url: Some(Url::parse("http://127.0.0.1:1/hook").unwrap()),
                ..settings()
            })
            .unwrap(),
        );

        assert_eq!(notifier.drain(Duration::from_secs(1)).await, 0);

        notifier.notify("one", MessageOptions::default());
        notifier.notify("two", MessageOptions::default());
        assert_eq!(notifier.drain(Duration::from_secs(5)).await, 0);
        assert!(notifier.pending.lock().unwrap().is_empty());
    }

    #[test]
    fn test_settings_from_config() {
        let config = NotificationConfig {
            webhook_url: Some("https://hooks.example.com/services/T000".into()),
            channel: Some("alerts".into()),
            username: Some(String::new()),
            icon_emoji: Some(":bell:".into()),
            disabled: false,
            timeout_secs: 3,
        };

        let settings = NotifierSettings::from_config(&config).unwrap();
        assert_eq!(settings.defaults.channel.as_deref(), Some("#alerts"));
        assert_eq!(settings.defaults.username, None);
        assert_eq!(settings.defaults.icon_emoji.as_deref(), Some(":bell:"));
        assert_eq!(settings.timeout, Duration::from_secs(3));

        let bad = NotificationConfig {
            webhook_url: Some("not a url".into()),
            ..config
        };
        assert!(matches!(NotifierSettings::from_config(&bad), Err(NotifyError::InvalidUrl { .. })));
    }
}
