//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (three routes in practice)
//! - Longest prefix wins, so lookup order never matters
//! - Explicit `None` rather than silent default

use crate::config::ServiceConfig;
use crate::routing::matcher::PathPrefixMatcher;

/// One entry of the static route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Service name ("products", "newsletter", "search").
    pub name: String,
    matcher: PathPrefixMatcher,
    /// Upstream base URL with any trailing `/` removed.
    pub upstream_base_url: String,
}

impl RouteEntry {
    pub fn new(
        name: impl Into<String>,
        path_prefix: impl Into<String>,
        upstream_base_url: impl AsRef<str>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: PathPrefixMatcher::new(path_prefix),
            upstream_base_url: upstream_base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn path_prefix(&self) -> &str {
        self.matcher.prefix()
    }

    /// Build the outbound target for `path_and_query` (identity rewrite).
    pub fn target_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.upstream_base_url, path_and_query)
    }

    /// Display name with the first letter capitalised ("Products").
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&ServiceConfig> for RouteEntry {
    fn from(service: &ServiceConfig) -> Self {
        RouteEntry::new(&service.name, &service.path_prefix, &service.url)
    }
}

/// Immutable route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new(routes: Vec<RouteEntry>) -> Self {
        Self { routes }
    }

    /// Compile the route table from configured services.
    pub fn from_config(services: &[ServiceConfig]) -> Self {
        let routes = services.iter().map(RouteEntry::from).collect::<Vec<_>>();
        tracing::debug!(count = routes.len(), "Route table compiled");
        Self::new(routes)
    }

    /// Longest-prefix match against the request path.
    pub fn match_path(&self, path: &str) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .filter(|route| route.matcher.matches(path))
            .max_by_key(|route| route.matcher.specificity())
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }
}
