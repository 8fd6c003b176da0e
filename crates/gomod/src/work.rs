//! `go.work` generation.

use crate::{Error, Result};
use crosslink_graph::ModuleGraph;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of a Go workspace file.
pub const WORK_FILE: &str = "go.work";

/// Render a `go.work` that uses every given module directory.
#[must_use]
pub fn render_go_work<'a>(go_version: &str, module_paths: impl IntoIterator<Item = &'a str>) -> String {
    let paths: BTreeSet<&str> = module_paths.into_iter().collect();
    let mut out = format!("go {go_version}\n\nuse (\n");
    for path in paths {
        out.push('\t');
        out.push_str(path);
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

/// Write `go.work` at `root` covering every module in `graph`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_go_work(root: &Path, graph: &ModuleGraph, go_version: &str) -> Result<PathBuf> {
    let path = root.join(WORK_FILE);
    let content = render_go_work(go_version, graph.nodes().map(|n| n.path.as_str()));
    fs::write(&path, content).map_err(|e| Error::io(e, path.clone(), "write go.work"))?;
    info!(path = %path.display(), modules = graph.len(), "Wrote go.work");
    Ok(path)
}
