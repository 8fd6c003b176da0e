use super::load_repository;
use crate::cli::CliError;
use crosslink_gomod::{ReplaceOptions, insert_replaces, prune_replaces};
use crosslink_graph::{GraphConfig, NamespacePolicy};
use std::path::Path;
use tracing::info;

fn options(overwrite: bool, exclude: &[String], policy: NamespacePolicy) -> ReplaceOptions {
    ReplaceOptions {
        overwrite,
        exclude: exclude.iter().cloned().collect(),
        namespace_policy: policy,
    }
}

/// Insert intra-repository `replace` directives into every manifest.
///
/// # Errors
///
/// Returns an error if the graph cannot be built or a manifest cannot be
/// read, parsed or written.
pub fn execute_insert(
    root: &Path,
    overwrite: bool,
    exclude: &[String],
    policy: NamespacePolicy,
) -> Result<(), CliError> {
    let repo = load_repository(root, &GraphConfig::default().with_namespace_policy(policy))?;
    let changes = insert_replaces(root, &repo.graph, &options(overwrite, exclude, policy))?;
    info!(manifests = changes.len(), "Inserted replace directives");
    Ok(())
}

/// Remove `replace` directives for repository modules no longer required.
///
/// # Errors
///
/// Returns an error if the graph cannot be built or a manifest cannot be
/// read, parsed or written.
pub fn execute_prune(
    root: &Path,
    exclude: &[String],
    policy: NamespacePolicy,
) -> Result<(), CliError> {
    let repo = load_repository(root, &GraphConfig::default().with_namespace_policy(policy))?;
    let changes = prune_replaces(root, &repo.graph, &options(false, exclude, policy))?;
    info!(manifests = changes.len(), "Pruned replace directives");
    Ok(())
}
