//! Notification subsystem.
//!
//! # Data Flow
//! ```text
//! intercept handler (rendered text)
//!     → dispatcher.rs (merge defaults, dry-run check)
//!     → payload.rs ({channel, username, text, icon_emoji})
//!     → webhook POST (spawned) or log line (dry-run)
//! ```

pub mod dispatcher;
pub mod payload;
pub mod template;

pub use dispatcher::{Delivery, Notifier, NotifierSettings, NotifyError};
pub use payload::{MessageOptions, NotificationPayload};
pub use template::MessageTemplate;
