//! Handler isolation boundary.
//!
//! Wraps exactly one handler invocation. Errors, panics and overruns are
//! logged once and converted into an outcome; nothing escapes to the caller.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;

use crate::intercept::handler::{InterceptContext, InterceptHandler};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Completed,
    Failed(String),
    Panicked(String),
    TimedOut,
}

impl HandlerOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, HandlerOutcome::Completed)
    }
}

/// Run `handler` against `ctx`, never failing.
pub async fn run_guarded(
    handler: &dyn InterceptHandler,
    ctx: &InterceptContext<'_>,
    limit: Duration,
) -> HandlerOutcome {
    // `handle` may panic before it returns its future.
    let invocation = AssertUnwindSafe(async move { handler.handle(ctx).await }).catch_unwind();

    let outcome = match with_timeout(limit, invocation).await {
        Ok(Ok(Ok(()))) => return HandlerOutcome::Completed,
        Ok(Ok(Err(e))) => {
            tracing::error!(handler = handler.name(), error = %e, "Intercept handler failed");
            HandlerOutcome::Failed(e.to_string())
        }
        Ok(Err(panic)) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(handler = handler.name(), error = %message, "Intercept handler panicked");
            HandlerOutcome::Panicked(message)
        }
        Err(elapsed) => {
            tracing::error!(handler = handler.name(), error = %elapsed, "Intercept handler timed out");
            HandlerOutcome::TimedOut
        }
    };

    metrics::record_handler_failure(handler.name());
    outcome
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::HandlerError;
    use crate::observability::logging::capture_logs;
    use crate::routing::RouteParams;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method, StatusCode};
    use futures_util::future::BoxFuture;

    #[derive(Debug)]
    enum Behaviour {
        Succeed,
        Fail,
        Panic,
        EagerPanic,
        Hang,
    }

    impl InterceptHandler for Behaviour {
        fn name(&self) -> &'static str {
            "test"
        }

        fn handle<'a>(&'a self, _ctx: &'a InterceptContext<'a>) -> BoxFuture<'a, Result<(), HandlerError>> {
            if let Behaviour::EagerPanic = self {
                let _limit: u32 = "x".parse().expect("handler setup failed");
            }

            Box::pin(async move {
                match self {
                    Behaviour::Succeed | Behaviour::EagerPanic => Ok(()),
                    Behaviour::Fail => Err(HandlerError::Other("boom".into())),
                    Behaviour::Panic => panic!("handler exploded"),
                    Behaviour::Hang => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok(())
                    }
                }
            })
        }
    }

    async fn run(behaviour: Behaviour) -> HandlerOutcome {
        let params = RouteParams::new();
        let headers = HeaderMap::new();
        let body = Bytes::from_static(b"{}");
        let ctx = InterceptContext {
            method: &Method::GET,
            path: "/",
            params: &params,
            status: StatusCode::OK,
            headers: &headers,
            body: &body,
        };
        run_guarded(&behaviour, &ctx, Duration::from_millis(100)).await
    }

    #[tokio::test]
    async fn test_success() {
        assert_eq!(run(Behaviour::Succeed).await, HandlerOutcome::Completed);
    }

    #[tokio::test]
    async fn test_error_is_contained() {
        assert_eq!(run(Behaviour::Fail).await, HandlerOutcome::Failed("boom".into()));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        assert_eq!(run(Behaviour::Panic).await, HandlerOutcome::Panicked("handler exploded".into()));
    }

    #[tokio::test]
    async fn test_panic_before_future_is_contained() {
        let outcome = run(Behaviour::EagerPanic).await;

        let HandlerOutcome::Panicked(message) = &outcome else {
            panic!("expected a contained panic, got {:?}", outcome);
        };
        assert!(message.contains("handler setup failed"));
    }

    #[tokio::test]
    async fn test_failure_logs_exactly_one_error() {
        let (logs, _guard) = capture_logs();

        assert_eq!(run(Behaviour::Fail).await, HandlerOutcome::Failed("boom".into()));

        let errors = logs.at_level("ERROR");
        assert_eq!(errors.len(), 1, "events: {:?}", logs.events());
        assert_eq!(errors[0]["fields"]["error"], "boom");
        assert_eq!(errors[0]["fields"]["handler"], "test");
    }

    #[tokio::test]
    async fn test_success_logs_nothing() {
        let (logs, _guard) = capture_logs();

        assert!(run(Behaviour::Succeed).await.is_completed());
        assert!(logs.events().is_empty());
    }

    #[tokio::test]
    async fn test_hang_is_cut_off() {
        assert_eq!(run(Behaviour::Hang).await, HandlerOutcome::TimedOut);
    }
}
