//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix, ignoring ASCII case
//! - Respect segment boundaries the way a mount point does
//!
//! # Design Decisions
//! - `/API/Products/1` falls under `/api/products`; the path itself is
//!   never rewritten, only compared
//! - `/api/products` matches `/api/products`, `/api/products/` and
//!   `/api/products/42`, never `/api/productsX`
//! - No regex to guarantee O(n) matching

/// Returns true if `path` falls under the mount point `prefix`.
pub fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match (path.get(..prefix.len()), path.get(prefix.len()..)) {
        (Some(head), Some(rest)) => {
            head.eq_ignore_ascii_case(prefix) && (rest.is_empty() || rest.starts_with('/'))
        }
        _ => false,
    }
}

/// Matches the request path against a mount-point prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length of the prefix, used to rank overlapping matches.
    pub fn specificity(&self) -> usize {
        self.prefix.trim_end_matches('/').len()
    }

    pub fn matches(&self, path: &str) -> bool {
        prefix_matches(&self.prefix, path)
    }
}
