//! Form submission transformer.
//!
//! # Data Flow
//! ```text
//! captured body (bytes)
//!     → submission.rs (JSON → FormSubmission)
//!     → render.rs (header line + one "> " line per reply)
//!     → notifier
//! ```

pub mod render;
pub mod submission;

pub use render::{render_body, render_submission, FormError, NO_ANSWER};
pub use submission::FormSubmission;
