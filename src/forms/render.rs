//! Rendering of form submissions into chat messages.
//!
//! ```text
//! *Survey* Submission *#7* at *Mon Oct 19 2026 10:00:00 UTC*
//! > *Color*: Red, Blue
//! > *Comments*: Great service
//! > *Rating*: (no answer)
//! ```

use serde_json::Value;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::forms::submission::{FormSubmission, Reply};

/// Rendered for a reply that carries neither options nor text.
pub const NO_ANSWER: &str = "(no answer)";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid form submission: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a raw submission body and render the notification text.
pub fn render_body(body: &[u8]) -> Result<String, FormError> {
    let submission = FormSubmission::from_slice(body)?;
    Ok(render_submission(&submission))
}

pub fn render_submission(submission: &FormSubmission) -> String {
    let mut lines = vec![header_line(submission)];
    lines.extend(
        submission
            .replies
            .iter()
            .flatten()
            .map(|reply| format!("> {}", reply_line(reply))),
    );
    lines.join("\n")
}

fn header_line(submission: &FormSubmission) -> String {
    let title = submission
        .header
        .as_ref()
        .and_then(|h| h.title.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or("Form");

    let number = match &submission.number {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "?".to_string(),
        Some(other) => other.to_string(),
    };

    format!(
        "*{}* Submission *#{}* at *{}*",
        title,
        number,
        format_date(submission.date_created.as_ref())
    )
}

/// Render one reply as `*question*: answer`.
pub fn reply_line(reply: &Reply) -> String {
    let question = reply.question.as_deref().unwrap_or_default();
    let answer = reply.answer.as_ref();

    if let Some(options) = answer.and_then(|a| a.options.as_ref()) {
        let titles: Vec<&str> = options.iter().filter_map(|o| o.title.as_deref()).collect();
        format!("*{}*: {}", question, titles.join(", "))
    } else if let Some(text) = answer.and_then(|a| a.text.as_deref()).filter(|t| !t.is_empty()) {
        format!("*{}*: {}", question, text)
    } else {
        format!("*{}*: {}", question, NO_ANSWER)
    }
}

/// Render `date_created` in UTC. Accepts RFC 3339 text or epoch milliseconds;
/// anything else is shown verbatim.
fn format_date(value: Option<&Value>) -> String {
    let parsed = match value {
        None | Some(Value::Null) => return "unknown date".to_string(),
        Some(Value::String(s)) => OffsetDateTime::parse(s, &Rfc3339).ok(),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()),
        Some(_) => None,
    };

    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day] [year] [hour]:[minute]:[second] UTC"
    );

    match parsed.and_then(|date| date.to_offset(time::UtcOffset::UTC).format(&format).ok()) {
        Some(formatted) => formatted,
        None => match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "unknown date".to_string(),
        },
    }
}
