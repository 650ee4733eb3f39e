//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (deadline on send + body capture) → 504 on expiry
//! Intercept handler:
//!     → timeouts.rs (deadline on handler) → logged, response released
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Single forward attempt; the upstream call is never retried

pub mod timeouts;
