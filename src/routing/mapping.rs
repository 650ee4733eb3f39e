//! Mapping table construction.
//!
//! # Data Flow
//! ```text
//! MAPPINGS (raw JSON text)
//!     → serde_json::Value
//!     → shape check (array, length % 3 == 0)   ── fatal on failure
//!     → groups of three → RouteRule
//! ```
//!
//! # Design Decisions
//! - Malformed JSON is tolerated: no custom routes, passthrough only
//! - Shape errors are fatal: a partially valid table never starts serving
//! - Unrecognized verbs are skipped without error

use axum::http::Method;
use serde_json::Value;
use thiserror::Error;

/// Declarative (method, path, message) binding produced from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub method: Method,
    pub path: String,
    pub message: String,
}

/// Fatal mapping configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("mappings JSON is not an array, expecting it to be (got {0})")]
    NotAnArray(&'static str),

    #[error("expected mappings to be in groups of three, got {0} elements")]
    BadArity(usize),
}

/// Verbs accepted in the first position of a mapping group.
static SUPPORTED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Build route rules from the raw mapping document.
///
/// `None` or an empty string yields no rules. Text that is not valid JSON is
/// logged and also yields no rules.
pub fn build_rules(raw: Option<&str>) -> Result<Vec<RouteRule>, MappingError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Couldn't parse the mappings JSON, continuing without custom routes");
            return Ok(Vec::new());
        }
    };

    rules_from_value(&value)
}

/// Build route rules from an already parsed mapping document.
pub fn rules_from_value(value: &Value) -> Result<Vec<RouteRule>, MappingError> {
    let items = value.as_array().ok_or(MappingError::NotAnArray(kind_of(value)))?;

    if items.len() % 3 != 0 {
        return Err(MappingError::BadArity(items.len()));
    }

    Ok(items
        .chunks_exact(3)
        .filter_map(|group| rule_from_group(&group[0], &group[1], &group[2]))
        .collect())
}

fn rule_from_group(method: &Value, path: &Value, message: &Value) -> Option<RouteRule> {
    let Some(method) = method
        .as_str()
        .and_then(|m| SUPPORTED_METHODS.iter().find(|s| s.as_str() == m))
    else {
        tracing::debug!(method = %method, "Skipping mapping with unrecognized method");
        return None;
    };

    let Some(path) = path.as_str() else {
        tracing::warn!(method = %method, path = %path, "Skipping mapping, path is not a string");
        return None;
    };

    let message = match message {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            tracing::warn!(method = %method, path = %path, message = %other, "Skipping mapping, message is not a scalar");
            return None;
        }
    };

    Some(RouteRule {
        method: method.clone(),
        path: path.to_string(),
        message,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
