//! Form submission document.
//!
//! Only validity as JSON is enforced. Every field the renderer reads is
//! optional (absent or `null`) so partial documents still produce a message.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormSubmission {
    pub header: Option<FormHeader>,
    pub number: Option<Value>,
    pub date_created: Option<Value>,
    pub replies: Option<Vec<Reply>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormHeader {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Reply {
    pub question: Option<String>,
    pub answer: Option<Answer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Answer {
    pub options: Option<Vec<AnswerOption>>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnswerOption {
    pub title: Option<String>,
}

impl FormSubmission {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
