use super::load_repository;
use crate::cli::CliError;
use crosslink_graph::{GraphConfig, NamespacePolicy};
use std::io::Write;
use std::path::Path;

/// Write the module graph in DOT format to `out`.
///
/// # Errors
///
/// Returns an error if the graph cannot be built or `out` cannot be written.
pub fn execute_graph(
    root: &Path,
    policy: NamespacePolicy,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let repo = load_repository(root, &GraphConfig::default().with_namespace_policy(policy))?;
    write!(out, "{}", repo.graph.to_dot())
        .and_then(|()| out.flush())
        .map_err(|e| {
            CliError::io_with_help(
                format!("Failed to write graph: {e}"),
                "The output stream was closed before the graph was written",
            )
        })
}
