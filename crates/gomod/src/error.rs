//! Error types for manifest discovery and editing.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering, reading or editing manifests.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The repository root has no `go.mod`.
    #[error("No root go.mod found in {root}")]
    #[diagnostic(
        code(crosslink::gomod::missing_root_manifest),
        help("Run crosslink from the repository root or pass --root pointing at it")
    )]
    MissingRootManifest {
        /// The directory that was searched.
        root: PathBuf,
    },

    /// A `go.mod` could not be parsed.
    #[error("Failed to parse {}:{line}: {message}", path.display())]
    #[diagnostic(
        code(crosslink::gomod::parse),
        help("Check the go.mod syntax, for example with 'go mod edit -fmt'")
    )]
    Parse {
        /// Path to the manifest.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A `go.mod` has no `module` directive.
    #[error("Missing module directive in {}", path.display())]
    #[diagnostic(code(crosslink::gomod::missing_module))]
    MissingModule {
        /// Path to the manifest.
        path: PathBuf,
    },

    /// I/O error while reading or writing a file.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(crosslink::gomod::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// The path being accessed.
        path: Option<PathBuf>,
        /// The operation being performed.
        operation: String,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {}: {source}", root.display())]
    #[diagnostic(code(crosslink::gomod::walk))]
    Walk {
        /// The directory being walked.
        root: PathBuf,
        /// The underlying walk error.
        #[source]
        source: walkdir::Error,
    },

    /// Graph construction or scheduling failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] crosslink_graph::Error),
}

impl Error {
    /// Create an I/O error with context.
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}
