//! Error types for graph construction and tidy scheduling.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a module graph or scheduling it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum Error {
    /// No retained manifest declares the root module.
    #[error("No manifest found for root module '{root}'")]
    #[diagnostic(
        code(crosslink::graph::missing_root),
        help("The repository root must contain the manifest of the root module and it must not be skipped")
    )]
    MissingRoot {
        /// The root module identifier.
        root: String,
    },

    /// Two manifests declare the same module identifier.
    #[error("Module '{module}' is declared by both '{first}' and '{second}'")]
    #[diagnostic(
        code(crosslink::graph::duplicate_module),
        help("Each module identifier must be declared by exactly one manifest")
    )]
    DuplicateModule {
        /// The duplicated module identifier.
        module: String,
        /// Location of the manifest seen first.
        first: String,
        /// Location of the conflicting manifest.
        second: String,
    },

    /// A module was looked up that is not part of the graph.
    #[error("Module '{module}' is not part of the dependency graph")]
    #[diagnostic(code(crosslink::graph::unknown_module))]
    UnknownModule {
        /// The module identifier that was not found.
        module: String,
    },

    /// Discovered cycles and the circular-dependency allowlist disagree.
    #[error("{}", format_mismatch(undeclared, stale))]
    #[diagnostic(
        code(crosslink::graph::allowlist_mismatch),
        help("Add undeclared modules to the allow-circular file and remove stale entries")
    )]
    AllowlistMismatch {
        /// Modules in a cycle that the allowlist does not declare.
        undeclared: Vec<String>,
        /// Allowlist entries that are no longer part of any cycle.
        stale: Vec<String>,
    },

    /// The produced schedule does not satisfy a dependency path.
    #[error("Schedule does not satisfy dependency path [{}]", path.join(" -> "))]
    #[diagnostic(
        code(crosslink::graph::schedule_invalid),
        help("This is an internal scheduling bug; please report it with the module graph")
    )]
    ScheduleInvalid {
        /// The offending path, dependencies first.
        path: Vec<String>,
    },
}

fn format_mismatch(undeclared: &[String], stale: &[String]) -> String {
    let mut parts = Vec::new();
    if !undeclared.is_empty() {
        parts.push(format!(
            "circular dependencies not in allowlist: {}",
            undeclared.join(", ")
        ));
    }
    if !stale.is_empty() {
        parts.push(format!(
            "allowlist entries not in a cycle: {}",
            stale.join(", ")
        ));
    }
    format!("Circular dependency allowlist mismatch ({})", parts.join("; "))
}

impl Error {
    /// Create a missing root error.
    #[must_use]
    pub fn missing_root(root: impl Into<String>) -> Self {
        Self::MissingRoot { root: root.into() }
    }

    /// Create a duplicate module error.
    #[must_use]
    pub fn duplicate_module(
        module: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateModule {
            module: module.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an unknown module error.
    #[must_use]
    pub fn unknown_module(module: impl Into<String>) -> Self {
        Self::UnknownModule {
            module: module.into(),
        }
    }

    /// Create an invalid schedule error for the given path.
    #[must_use]
    pub fn schedule_invalid(path: Vec<String>) -> Self {
        Self::ScheduleInvalid { path }
    }
}
