//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (ProxyConfig::default)
//!     → loader.rs (optional TOML file)
//!     → loader.rs (flags / environment overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → resolved once at startup, handed to subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The mapping document stays raw text here; routing owns its parsing

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigArgs, ConfigError};
pub use schema::{
    InterceptConfig, ListenerConfig, NotificationConfig, ObservabilityConfig, ProxyConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
