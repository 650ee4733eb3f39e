//! Intercept handlers.
//!
//! A handler runs against the captured upstream response of a matched route,
//! before that response is released to the client. Its result never changes
//! what the client receives.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::forms::{self, FormError};
use crate::notify::{MessageOptions, MessageTemplate, Notifier};
use crate::routing::RouteParams;

/// Read-only view of one intercepted exchange.
#[derive(Debug)]
pub struct InterceptContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub params: &'a RouteParams,
    pub status: StatusCode,
    pub headers: &'a HeaderMap,
    pub body: &'a Bytes,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("{0}")]
    Other(String),
}

/// Side-effect bound to an intercept route.
pub trait InterceptHandler: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Human-readable description of what the handler sends.
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn handle<'a>(&'a self, ctx: &'a InterceptContext<'a>) -> BoxFuture<'a, Result<(), HandlerError>>;
}

/// Posts a fixed (or templated) message for every matched request.
pub struct NotifyHandler {
    template: MessageTemplate,
    notifier: Arc<Notifier>,
}

impl NotifyHandler {
    pub fn new(message: impl Into<String>, notifier: Arc<Notifier>) -> Self {
        Self {
            template: MessageTemplate::new(message),
            notifier,
        }
    }

    fn render(&self, ctx: &InterceptContext<'_>) -> String {
        let mut vars: HashMap<&str, String> = ctx
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect();
        vars.insert("method", ctx.method.to_string());
        vars.insert("path", ctx.path.to_string());
        vars.insert("status", ctx.status.as_u16().to_string());

        self.template.render(&vars)
    }
}

impl fmt::Debug for NotifyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyHandler")
            .field("template", &self.template.as_str())
            .finish()
    }
}

impl InterceptHandler for NotifyHandler {
    fn name(&self) -> &'static str {
        "notify"
    }

    fn describe(&self) -> String {
        format!("notify: {}", self.template.as_str())
    }

    fn handle<'a>(&'a self, ctx: &'a InterceptContext<'a>) -> BoxFuture<'a, Result<(), HandlerError>> {
        Box::pin(async move {
            self.notifier.notify(self.render(ctx), MessageOptions::default());
            Ok(())
        })
    }
}

/// Renders a form submission from the captured body and posts it.
pub struct FormSubmissionHandler {
    notifier: Arc<Notifier>,
}

impl FormSubmissionHandler {
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self { notifier }
    }
}

impl fmt::Debug for FormSubmissionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSubmissionHandler").finish()
    }
}

impl InterceptHandler for FormSubmissionHandler {
    fn name(&self) -> &'static str {
        "form-submission"
    }

    fn handle<'a>(&'a self, ctx: &'a InterceptContext<'a>) -> BoxFuture<'a, Result<(), HandlerError>> {
        Box::pin(async move {
            let message = forms::render_body(ctx.body)?;
            self.notifier.notify(message, MessageOptions::default());
            Ok(())
        })
    }
}
