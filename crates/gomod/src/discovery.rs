//! Manifest enumeration for a multi-module repository.
//!
//! Walks the repository with `walkdir`, pruning directories the Go tool
//! ignores (`vendor`, `testdata`, and anything starting with `.` or `_`).

use crate::modfile::GoMod;
use crate::{Error, Result};
use crosslink_graph::{ManifestRecord, normalize_module_path};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// File name of a module manifest.
pub const MANIFEST_FILE: &str = "go.mod";

/// The manifests found under a repository root.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// The repository root that was walked.
    pub root: PathBuf,
    /// Module identifier declared by the root manifest.
    pub root_module: String,
    /// `go` directive of the root manifest.
    pub go_version: Option<String>,
    /// One record per manifest, in walk order.
    pub records: Vec<ManifestRecord>,
}

impl Discovery {
    /// Absolute path of the manifest for a module directory.
    #[must_use]
    pub fn manifest_path(&self, module_path: &str) -> PathBuf {
        manifest_path(&self.root, module_path)
    }
}

/// Path of the manifest for the Go-style module directory `module_path`.
#[must_use]
pub fn manifest_path(root: &Path, module_path: &str) -> PathBuf {
    let normalized = normalize_module_path(module_path);
    let mut path = root.to_path_buf();
    for segment in normalized.split('/').filter(|s| *s != ".") {
        path.push(segment);
    }
    path.join(MANIFEST_FILE)
}

/// Enumerate every manifest under `root`.
///
/// # Errors
///
/// Returns [`Error::MissingRootManifest`] if `root` has no manifest, and
/// propagates walk, read and parse failures.
pub fn discover(root: &Path) -> Result<Discovery> {
    let root_manifest = root.join(MANIFEST_FILE);
    if !root_manifest.is_file() {
        return Err(Error::MissingRootManifest {
            root: root.to_path_buf(),
        });
    }
    let root_mod = GoMod::read(&root_manifest)?;

    let mut records = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e));

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
            continue;
        }

        let manifest = GoMod::read(entry.path())?;
        let dir = entry.path().parent().unwrap_or(root);
        let path = module_dir(root, dir);
        debug!(module = %manifest.module(), path = %path, "Found manifest");

        records.push(ManifestRecord {
            path,
            module: manifest.module().to_string(),
            requires: manifest.require_paths(),
        });
    }

    debug!(
        root = %root.display(),
        manifests = records.len(),
        "Discovered manifests"
    );

    Ok(Discovery {
        root: root.to_path_buf(),
        root_module: root_mod.module().to_string(),
        go_version: root_mod.go_version().map(String::from),
        records,
    })
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || name == "vendor" || name == "testdata"
}

fn module_dir(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    normalize_module_path(&segments.join("/"))
}
