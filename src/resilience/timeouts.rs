//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls and intercept handlers with a deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out upstream requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {}ms", .0.as_millis())]
pub struct TimedOut(pub Duration);

/// Await `future`, giving up after `limit`.
pub async fn with_timeout<F>(limit: Duration, future: F) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| TimedOut(limit))
}
