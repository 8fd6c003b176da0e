//! crosslink: release engineering for multi-module Go repositories.
//!
//! The binary wires the [`crosslink_graph`] algorithms and the
//! [`crosslink_gomod`] manifest tooling into five subcommands:
//!
//! - `tidylist` writes the order in which modules must be tidied
//! - `insert` / `prune` maintain intra-repository `replace` directives
//! - `work` writes a `go.work` covering every module
//! - `graph` prints the module graph in DOT format

pub mod cli;
pub mod commands;
pub mod config;
pub mod tracing;

pub use cli::{CliError, EXIT_CLI, EXIT_GRAPH, EXIT_OK, exit_code_for, render_error};
