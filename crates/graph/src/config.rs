//! Graph construction settings.
//!
//! [`GraphConfig`] is passed explicitly into [`ModuleGraph::build`](crate::ModuleGraph::build)
//! rather than read from process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a module identifier is matched against the root namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespacePolicy {
    /// The module identifier must start with the root identifier.
    #[default]
    Prefix,
    /// The module identifier must contain the root identifier anywhere.
    Contains,
}

impl NamespacePolicy {
    /// Returns `true` if `module` belongs to the namespace rooted at `root`.
    #[must_use]
    pub fn admits(self, root: &str, module: &str) -> bool {
        match self {
            Self::Prefix => module.starts_with(root),
            Self::Contains => module.contains(root),
        }
    }
}

/// Manifest locations excluded from the graph before any node is created.
///
/// Entries are module directories relative to the repository root. `a/b`,
/// `./a/b`, `./a/b/` and `./a/b/go.mod` all name the same module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    paths: BTreeSet<String>,
}

impl SkipList {
    /// Create an empty skip-list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the module directory `path` is skipped.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(&normalize_module_path(path))
    }

    /// Number of skipped locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if nothing is skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkipList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter
                .into_iter()
                .map(|p| normalize_module_path(p.as_ref()))
                .collect(),
        }
    }
}

/// Bring a module directory into the canonical `.` / `./a/b` form.
#[must_use]
pub fn normalize_module_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches("go.mod");
    let segments: Vec<&str> = trimmed
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.is_empty() {
        ".".to_string()
    } else {
        format!("./{}", segments.join("/"))
    }
}

/// Settings that shape how a [`ModuleGraph`](crate::ModuleGraph) is built.
#[derive(Debug, Clone, Default)]
pub struct GraphConfig {
    /// Namespace filter applied to module identifiers.
    pub namespace_policy: NamespacePolicy,
    /// Module directories pruned before node creation.
    pub skip: SkipList,
}

impl GraphConfig {
    /// Replace the skip-list.
    #[must_use]
    pub fn with_skip(mut self, skip: SkipList) -> Self {
        self.skip = skip;
        self
    }

    /// Replace the namespace policy.
    #[must_use]
    pub fn with_namespace_policy(mut self, policy: NamespacePolicy) -> Self {
        self.namespace_policy = policy;
        self
    }
}
