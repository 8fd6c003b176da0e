//! Inserting and pruning intra-repository `replace` directives.
//!
//! Every module gets a directory `replace` for each module it depends on,
//! directly or transitively, inside the same repository, so that local builds
//! always use the checked-out sources.

use crate::Result;
use crate::discovery::manifest_path;
use crate::modfile::{GoMod, ReplaceOutcome};
use crosslink_graph::{ModuleGraph, NamespacePolicy, normalize_module_path};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options shared by [`insert_replaces`] and [`prune_replaces`].
#[derive(Debug, Clone, Default)]
pub struct ReplaceOptions {
    /// Rewrite existing directives that point somewhere else.
    pub overwrite: bool,
    /// Modules whose manifests are not edited and that are never targets.
    pub exclude: BTreeSet<String>,
    /// Policy deciding which replaced paths belong to the repository.
    pub namespace_policy: NamespacePolicy,
}

/// Edits made to one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestChange {
    /// The module whose manifest changed.
    pub module: String,
    /// Path of the manifest on disk.
    pub manifest: PathBuf,
    /// Modules that gained a directive.
    pub added: Vec<String>,
    /// Modules whose directive was rewritten.
    pub overwritten: Vec<String>,
    /// Modules whose directive was removed.
    pub removed: Vec<String>,
}

/// Path from the module directory `from` to the module directory `to`.
///
/// Both arguments are Go-style (`.` or `./a/b`); the result always starts
/// with `./` or `../` so the Go tool treats it as a directory.
#[must_use]
pub fn relative_module_path(from: &str, to: &str) -> String {
    let from = normalize_module_path(from);
    let to = normalize_module_path(to);
    let from: Vec<&str> = from.split('/').filter(|s| *s != ".").collect();
    let to: Vec<&str> = to.split('/').filter(|s| *s != ".").collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let ups = from.len() - common;
    let rest = &to[common..];

    let mut parts: Vec<&str> = std::iter::repeat_n("..", ups).collect();
    parts.extend_from_slice(rest);

    if parts.is_empty() {
        ".".to_string()
    } else if ups == 0 {
        format!("./{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}

/// Add a directory `replace` to every manifest for each of its transitive
/// intra-repository dependencies.
///
/// # Errors
///
/// Propagates manifest read, parse and write failures.
pub fn insert_replaces(
    root: &Path,
    graph: &ModuleGraph,
    options: &ReplaceOptions,
) -> Result<Vec<ManifestChange>> {
    let mut changes = Vec::new();

    for node in graph.nodes() {
        if options.exclude.contains(&node.name) {
            debug!(module = %node.name, "Excluded from replace insertion");
            continue;
        }
        let deps: Vec<String> = graph
            .transitive_deps(&node.name)?
            .into_iter()
            .filter(|dep| !options.exclude.contains(dep))
            .collect();
        if deps.is_empty() {
            continue;
        }

        let manifest = manifest_path(root, &node.path);
        let mut gomod = GoMod::read(&manifest)?;
        let mut change = ManifestChange {
            module: node.name.clone(),
            manifest: manifest.clone(),
            ..ManifestChange::default()
        };

        for dep in deps {
            let Some(dep_node) = graph.node(&dep) else {
                continue;
            };
            let target = relative_module_path(&node.path, &dep_node.path);
            match gomod.set_replace(&dep, &target, options.overwrite) {
                ReplaceOutcome::Added => change.added.push(dep),
                ReplaceOutcome::Overwritten { previous } => {
                    debug!(module = %node.name, dep = %dep, previous = %previous, "Overwrote replace");
                    change.overwritten.push(dep);
                }
                ReplaceOutcome::Kept { existing } => {
                    warn!(
                        module = %node.name,
                        dep = %dep,
                        existing = %existing,
                        wanted = %target,
                        "Existing replace points elsewhere; pass --overwrite to rewrite it"
                    );
                }
                ReplaceOutcome::Unchanged => {}
            }
        }

        if gomod.is_modified() {
            gomod.write(&manifest)?;
            info!(
                module = %node.name,
                added = change.added.len(),
                overwritten = change.overwritten.len(),
                "Updated replace directives"
            );
            changes.push(change);
        }
    }

    Ok(changes)
}

/// Remove `replace` directives for repository modules that a manifest no
/// longer depends on.
///
/// # Errors
///
/// Propagates manifest read, parse and write failures.
pub fn prune_replaces(
    root: &Path,
    graph: &ModuleGraph,
    options: &ReplaceOptions,
) -> Result<Vec<ManifestChange>> {
    let mut changes = Vec::new();

    for node in graph.nodes() {
        if options.exclude.contains(&node.name) {
            debug!(module = %node.name, "Excluded from replace pruning");
            continue;
        }
        let deps: BTreeSet<String> = graph.transitive_deps(&node.name)?.into_iter().collect();

        let manifest = manifest_path(root, &node.path);
        let mut gomod = GoMod::read(&manifest)?;
        let removed = gomod.remove_replaces(|replace| {
            options
                .namespace_policy
                .admits(graph.root(), &replace.old_path)
                && !options.exclude.contains(&replace.old_path)
                && !deps.contains(&replace.old_path)
        });
        if removed.is_empty() {
            continue;
        }

        gomod.write(&manifest)?;
        let removed: Vec<String> = removed.into_iter().map(|r| r.old_path).collect();
        info!(module = %node.name, removed = removed.len(), "Pruned replace directives");
        changes.push(ManifestChange {
            module: node.name.clone(),
            manifest,
            removed,
            ..ManifestChange::default()
        });
    }

    Ok(changes)
}
