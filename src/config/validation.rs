//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream target and webhook URLs
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target URL is required (TARGET_URL)")]
    MissingTarget,

    #[error("target URL '{0}' is invalid: {1}")]
    InvalidTarget(String, String),

    #[error("target URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("webhook URL '{0}' is invalid: {1}")]
    InvalidWebhook(String, String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.upstream.target_url.as_deref().map(str::trim) {
        None | Some("") => errors.push(ValidationError::MissingTarget),
        Some(target) => match Url::parse(target) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => errors.push(ValidationError::UnsupportedScheme(target.to_string())),
            Err(e) => errors.push(ValidationError::InvalidTarget(target.to_string(), e.to_string())),
        },
    }

    if let Some(webhook) = config.notifications.webhook_url.as_deref().map(str::trim) {
        if !webhook.is_empty() {
            if let Err(e) = Url::parse(webhook) {
                errors.push(ValidationError::InvalidWebhook(webhook.to_string(), e.to_string()));
            }
        }
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream timeout"));
    }
    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("request body limit"));
    }
    if config.notifications.timeout_secs == 0 {
        errors.push(ValidationError::Zero("webhook timeout"));
    }
    if config.intercept.handler_timeout_ms == 0 {
        errors.push(ValidationError::Zero("handler timeout"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.upstream.target_url = Some("http://localhost:8080/api".into());
        config
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_missing_target() {
        let mut config = valid();
        config.upstream.target_url = None;
        assert_eq!(validate_config(&config), Err(vec![ValidationError::MissingTarget]));

        config.upstream.target_url = Some("  ".into());
        assert_eq!(validate_config(&config), Err(vec![ValidationError::MissingTarget]));
    }

    #[test]
    fn test_bad_target() {
        let mut config = valid();
        config.upstream.target_url = Some("ftp://files.example.com".into());
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UnsupportedScheme("ftp://files.example.com".into())])
        );

        config.upstream.target_url = Some("localhost:8080".into());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.upstream.target_url = None;
        config.upstream.timeout_secs = 0;
        config.notifications.webhook_url = Some("::nope".into());
        config.intercept.handler_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero("handler timeout")));
    }
}
