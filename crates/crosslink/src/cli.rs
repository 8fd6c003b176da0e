//! Command-line definition, error type and exit codes.

use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Graph, scheduling or manifest error exit code
pub const EXIT_GRAPH: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(crosslink::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Graph construction, scheduling or manifest error (exit code 3)
    #[error("{message}")]
    #[diagnostic(code(crosslink::cli::graph))]
    Graph {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Filesystem error (exit code 3)
    #[error("I/O error: {message}")]
    #[diagnostic(code(crosslink::cli::io))]
    Io {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new graph error
    #[must_use]
    pub fn graph(message: impl Into<String>) -> Self {
        Self::Graph {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new I/O error with help text
    #[must_use]
    pub fn io_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Add help text to an existing error, returning a new error with the help text set.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Graph { message, .. } => Self::Graph { message, help },
            Self::Io { message, .. } => Self::Io { message, help },
        }
    }
}

fn help_of(err: &dyn Diagnostic) -> Option<String> {
    err.help().map(|h| h.to_string())
}

/// Every graph error is a graph failure (exit code 3); the library's help
/// text is carried over.
impl From<crosslink_graph::Error> for CliError {
    fn from(err: crosslink_graph::Error) -> Self {
        Self::Graph {
            help: help_of(&err),
            message: err.to_string(),
        }
    }
}

/// Convert `crosslink_gomod::Error` to the matching `CliError` variant.
///
/// - A missing root manifest means crosslink was pointed at the wrong
///   directory -> Config (exit code 2)
/// - Unparseable manifests and graph failures -> Graph (exit code 3)
/// - Filesystem failures -> Io (exit code 3)
impl From<crosslink_gomod::Error> for CliError {
    fn from(err: crosslink_gomod::Error) -> Self {
        let help = help_of(&err);
        match err {
            crosslink_gomod::Error::Graph(inner) => inner.into(),
            crosslink_gomod::Error::MissingRootManifest { .. } => Self::Config {
                message: err.to_string(),
                help,
            },
            crosslink_gomod::Error::Parse { .. } | crosslink_gomod::Error::MissingModule { .. } => {
                Self::Graph {
                    message: err.to_string(),
                    help,
                }
            }
            crosslink_gomod::Error::Io { .. } | crosslink_gomod::Error::Walk { .. } => Self::Io {
                message: err.to_string(),
                help,
            },
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Graph { .. } | CliError::Io { .. } => EXIT_GRAPH,
    }
}

/// Render an error to stderr with miette
#[allow(clippy::print_stderr)]
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    eprintln!("{report:?}");
    let _ = io::stderr().flush();
}

/// Release-engineering helper for multi-module Go repositories.
#[derive(Parser, Debug)]
#[command(name = "crosslink")]
#[command(about = "Release-engineering helper for multi-module Go repositories")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Repository root containing the root go.mod.
    #[arg(
        long,
        global = true,
        env = "CROSSLINK_ROOT",
        default_value = ".",
        value_name = "DIR"
    )]
    pub root: PathBuf,

    /// Configuration file; defaults to crosslink.toml in the root.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(long, global = true, default_value = "pretty", value_enum)]
    pub log_format: TracingFormat,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write the order in which modules must be tidied.
    #[command(about = "Write the order in which modules must be tidied")]
    Tidylist {
        /// File receiving one module directory per line.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
        /// File listing the modules allowed to take part in a cycle.
        #[arg(long, value_name = "FILE")]
        allow_circular: Option<PathBuf>,
        /// File listing module directories to leave out.
        #[arg(long, value_name = "FILE")]
        skip: Option<PathBuf>,
        /// Check the schedule against every dependency path before writing.
        #[arg(long)]
        verify: bool,
    },
    /// Add replace directives for intra-repository dependencies.
    #[command(about = "Add replace directives for intra-repository dependencies")]
    Insert {
        /// Rewrite existing replace directives that point elsewhere.
        #[arg(long)]
        overwrite: bool,
        /// Module to leave untouched (repeatable).
        #[arg(long, value_name = "MODULE")]
        exclude: Vec<String>,
    },
    /// Remove replace directives that are no longer needed.
    #[command(about = "Remove replace directives that are no longer needed")]
    Prune {
        /// Module to leave untouched (repeatable).
        #[arg(long, value_name = "MODULE")]
        exclude: Vec<String>,
    },
    /// Write a go.work file listing every module.
    #[command(about = "Write a go.work file listing every module")]
    Work {
        /// Go version for the go directive; defaults to the root go.mod's.
        #[arg(long = "go", value_name = "VERSION")]
        go_version: Option<String>,
    },
    /// Print the module dependency graph in DOT format.
    #[command(about = "Print the module dependency graph in DOT format")]
    Graph,
}

impl Commands {
    /// Subcommand name used in tracing spans.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tidylist { .. } => "tidylist",
            Self::Insert { .. } => "insert",
            Self::Prune { .. } => "prune",
            Self::Work { .. } => "work",
            Self::Graph => "graph",
        }
    }
}

/// Parse command-line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
