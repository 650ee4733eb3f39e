//! Chat webhook payload.

use serde::{Deserialize, Serialize};

/// Per-call overrides for the process-wide notification defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub channel: Option<String>,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
}

impl MessageOptions {
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = Some(icon_emoji.into());
        self
    }

    /// Fill every unset field from `defaults`. Values already set win.
    pub fn or(self, defaults: &MessageOptions) -> Self {
        Self {
            channel: self.channel.or_else(|| defaults.channel.clone()),
            username: self.username.or_else(|| defaults.username.clone()),
            icon_emoji: self.icon_emoji.or_else(|| defaults.icon_emoji.clone()),
        }
    }
}

/// JSON document posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
}

impl NotificationPayload {
    pub fn new(text: impl Into<String>, options: MessageOptions) -> Self {
        Self {
            channel: options.channel,
            username: options.username,
            text: text.into(),
            icon_emoji: options.icon_emoji,
        }
    }
}

/// Normalize a configured channel name to `#name`. Names that already carry a
/// `#` or `@` sigil are kept as they are; blank names are dropped.
pub fn normalize_channel(channel: &str) -> Option<String> {
    let channel = channel.trim();
    if channel.is_empty() {
        None
    } else if channel.starts_with('#') || channel.starts_with('@') {
        Some(channel.to_string())
    } else {
        Some(format!("#{}", channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_site_overrides_win() {
        let defaults = MessageOptions::default()
            .channel("#general")
            .username("proxy")
            .icon_emoji(":robot_face:");

        let merged = MessageOptions::default().channel("#ops").or(&defaults);

        assert_eq!(merged.channel.as_deref(), Some("#ops"));
        assert_eq!(merged.username.as_deref(), Some("proxy"));
        assert_eq!(merged.icon_emoji.as_deref(), Some(":robot_face:"));
    }

    #[test]
    fn test_payload_serialization() {
        let payload = NotificationPayload::new(
            "hello",
            MessageOptions::default().channel("#general").icon_emoji(":wave:"),
        );

        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r##"{"channel":"#general","text":"hello","icon_emoji":":wave:"}"##
        );
    }

    #[test]
    fn test_normalize_channel() {
        assert_eq!(normalize_channel("general").as_deref(), Some("#general"));
        assert_eq!(normalize_channel("#general").as_deref(), Some("#general"));
        assert_eq!(normalize_channel("@someone").as_deref(), Some("@someone"));
        assert_eq!(normalize_channel("  "), None);
    }
}
