//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     MAPPINGS JSON
//!     → mapping.rs (shape checks, RouteRule[])
//!     → router.rs (RouteTable, one handler per rule)
//!
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate path pattern)
//!     → Return: matched Route (intercept) or NoMatch (plain proxy)
//!
//! Forwarding:
//!     rewrite.rs (upstream base path + inbound path + query)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod mapping;
pub mod matcher;
pub mod rewrite;
pub mod router;

pub use mapping::{build_rules, MappingError, RouteRule};
pub use matcher::{PathPattern, RouteParams};
pub use rewrite::{rewrite_url, DotSegment};
pub use router::{Registration, Route, RouteMatch, RouteTable};
