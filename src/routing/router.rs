//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store intercept routes keyed by (method, path pattern)
//! - Look up the route for an inbound request
//! - Return the matched route or an explicit no-match (plain proxy)
//!
//! # Design Decisions
//! - Written once at startup, read-only afterwards (shared via Arc, no locks)
//! - O(n) scan in registration order, first match wins
//! - Re-registering an identity replaces the handler in place (last wins)
//! - Pinned routes cannot be replaced by later registrations

use axum::http::Method;
use std::sync::Arc;

use crate::intercept::InterceptHandler;
use crate::routing::matcher::{PathPattern, RouteParams};

/// A single intercept route.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: Arc<dyn InterceptHandler>,
    pinned: bool,
}

impl Route {
    fn same_identity(&self, method: &Method, pattern: &PathPattern) -> bool {
        self.method == *method && self.pattern.identity() == pattern.identity()
    }
}

/// Outcome of registering a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    Replaced,
    Shadowed,
}

/// A route matched for a request, with its captured parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: RouteParams,
}

/// Immutable-after-startup table of intercept routes.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route that later registrations cannot override.
    pub fn pin(&mut self, method: Method, pattern: PathPattern, handler: Arc<dyn InterceptHandler>) {
        self.insert(method, pattern, handler, true);
    }

    /// Register a route, replacing an earlier route with the same identity.
    pub fn register(
        &mut self,
        method: Method,
        pattern: PathPattern,
        handler: Arc<dyn InterceptHandler>,
    ) -> Registration {
        self.insert(method, pattern, handler, false)
    }

    fn insert(
        &mut self,
        method: Method,
        pattern: PathPattern,
        handler: Arc<dyn InterceptHandler>,
        pinned: bool,
    ) -> Registration {
        match self.routes.iter_mut().find(|r| r.same_identity(&method, &pattern)) {
            Some(existing) if existing.pinned => Registration::Shadowed,
            Some(existing) => {
                existing.pattern = pattern;
                existing.handler = handler;
                existing.pinned = pinned;
                Registration::Replaced
            }
            None => {
                self.routes.push(Route {
                    method,
                    pattern,
                    handler,
                    pinned,
                });
                Registration::Added
            }
        }
    }

    /// Find the intercept route for a request, if any.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.matches(path).map(|params| RouteMatch { route, params }))
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
