//! Route pattern matching logic.
//!
//! # Responsibilities
//! - Compile a route pattern (`/v1/form/:form_id/submission`) into segments
//! - Match request paths and capture named parameters
//!
//! # Design Decisions
//! - Literal segments match case-insensitively
//! - A single trailing slash on the request path is ignored
//! - `*` as the last segment matches any remainder, including nothing
//! - No regex in the hot path

use std::collections::HashMap;
use std::fmt;

/// Named parameters captured while matching a path.
pub type RouteParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. Every string is a valid pattern; segments that are
    /// neither `:name` nor `*` are treated as literals.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = split(&raw)
            .map(|seg| match seg {
                "*" => Segment::Wildcard,
                s if s.len() > 1 && s.starts_with(':') => Segment::Param(s[1..].to_string()),
                s => Segment::Literal(s.to_lowercase()),
            })
            .collect();

        Self { raw, segments }
    }

    /// The pattern as it was written in configuration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning the captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let mut params = RouteParams::new();
        let mut parts = split(path);

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard if i + 1 == self.segments.len() => return Some(params),
                Segment::Wildcard => {
                    parts.next()?;
                }
                Segment::Literal(expected) => {
                    let part = parts.next()?;
                    if part.to_lowercase() != *expected {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let part = parts.next()?;
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        match parts.next() {
            None => Some(params),
            Some(_) => None,
        }
    }

    /// Canonical form used to compare route identities.
    pub(crate) fn identity(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Param(_) => out.push(':'),
                Segment::Wildcard => out.push('*'),
            }
        }
        out
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

/// Split a path into segments, dropping the leading slash and one trailing
/// slash. The root path yields no segments.
fn split(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}
