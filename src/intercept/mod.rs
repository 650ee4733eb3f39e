//! Request interception subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → engine.rs (route lookup: intercept or plain proxy)
//!     → forward.rs (rewrite URL, single upstream attempt)
//!     → engine.rs (capture body when intercepting)
//!     → guard.rs (run handler.rs, contain any failure)
//!     → http::response (release unchanged response)
//! ```
//!
//! # Design Decisions
//! - The isolation boundary wraps the handler only, never the forwarding call
//! - The form-submission route is pinned ahead of all mapped routes

pub mod engine;
pub mod forward;
pub mod guard;
pub mod handler;

use std::sync::Arc;

use axum::http::Method;

use crate::notify::Notifier;
use crate::routing::{PathPattern, Registration, RouteRule, RouteTable};

pub use engine::{InterceptEngine, Mode};
pub use forward::{ForwardError, Forwarder};
pub use guard::{run_guarded, HandlerOutcome};
pub use handler::{
    FormSubmissionHandler, HandlerError, InterceptContext, InterceptHandler, NotifyHandler,
};

/// Built-in route that always runs the form-submission transformer.
pub const FORM_SUBMISSION_PATH: &str = "/v1/form/:form_id/submission";

/// Register the form-submission route followed by one notify route per rule.
pub fn build_routes(rules: &[RouteRule], notifier: Arc<Notifier>) -> RouteTable {
    let mut table = RouteTable::new();
    table.pin(
        Method::POST,
        PathPattern::new(FORM_SUBMISSION_PATH),
        Arc::new(FormSubmissionHandler::new(Arc::clone(&notifier))),
    );

    for rule in rules {
        let handler = Arc::new(NotifyHandler::new(rule.message.clone(), Arc::clone(&notifier)));
        match table.register(rule.method.clone(), PathPattern::new(rule.path.as_str()), handler) {
            Registration::Added => {
                tracing::info!(method = %rule.method, path = %rule.path, message = %rule.message, "Mapped route");
            }
            Registration::Replaced => {
                tracing::warn!(method = %rule.method, path = %rule.path, message = %rule.message, "Mapped route replaces an earlier mapping");
            }
            Registration::Shadowed => {
                tracing::warn!(method = %rule.method, path = %rule.path, "Mapping ignored, the form submission route takes precedence");
            }
        }
    }

    table
}
