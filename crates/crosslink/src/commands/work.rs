use super::load_repository;
use crate::cli::CliError;
use crosslink_gomod::write_go_work;
use crosslink_graph::{GraphConfig, NamespacePolicy};
use std::path::{Path, PathBuf};

/// Write `go.work` at `root`, returning its path.
///
/// The `go` directive comes from `go_version`, falling back to the root
/// manifest's own directive.
///
/// # Errors
///
/// Returns a configuration error if no Go version is known, and propagates
/// discovery and write failures.
pub fn execute_work(
    root: &Path,
    go_version: Option<&str>,
    policy: NamespacePolicy,
) -> Result<PathBuf, CliError> {
    let repo = load_repository(root, &GraphConfig::default().with_namespace_policy(policy))?;
    let version = go_version
        .map(String::from)
        .or(repo.go_version)
        .ok_or_else(|| {
            CliError::config_with_help(
                "The root go.mod has no go directive",
                "Pass --go <VERSION>",
            )
        })?;
    Ok(write_go_work(root, &repo.graph, &version)?)
}
