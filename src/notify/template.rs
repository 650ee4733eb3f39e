//! Message templates for mapped routes.
//!
//! A template is plain text with optional `{{name}}` placeholders. `method`,
//! `path` and `status` describe the intercepted exchange; any other name is
//! looked up among the captured route parameters. Unknown placeholders are
//! left verbatim.

use std::collections::HashMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A parsed message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    raw: String,
    has_placeholders: bool,
}

impl MessageTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let has_placeholders = raw
            .find(OPEN)
            .is_some_and(|start| raw[start + OPEN.len()..].contains(CLOSE));
        Self { raw, has_placeholders }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute placeholders from `vars`.
    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        if !self.has_placeholders {
            return self.raw.clone();
        }

        let mut out = String::with_capacity(self.raw.len());
        let mut rest = self.raw.as_str();

        while let Some(start) = rest.find(OPEN) {
            let after_open = &rest[start + OPEN.len()..];
            let Some(end) = after_open.find(CLOSE) else {
                break;
            };

            out.push_str(&rest[..start]);
            let name = after_open[..end].trim();
            match vars.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
            }
            rest = &after_open[end + CLOSE.len()..];
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> HashMap<&'static str, String> {
        HashMap::from([
            ("method", "DELETE".to_string()),
            ("path", "/orders/42".to_string()),
            ("status", "204".to_string()),
            ("id", "42".to_string()),
        ])
    }

    #[test]
    fn test_plain_message_is_unchanged() {
        let template = MessageTemplate::new("A new order was placed!");
        assert_eq!(template.render(&vars()), "A new order was placed!");
    }

    #[test]
    fn test_substitution() {
        let template = MessageTemplate::new("{{method}} {{ path }} -> {{status}} (order {{id}})");
        assert_eq!(template.render(&vars()), "DELETE /orders/42 -> 204 (order 42)");
    }

    #[test]
    fn test_unknown_and_unterminated_placeholders() {
        let template = MessageTemplate::new("{{nope}} and {{id}} and {{broken");
        assert_eq!(template.render(&vars()), "{{nope}} and 42 and {{broken");
    }
}
