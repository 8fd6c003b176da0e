//! Integration tests for replace insertion and pruning on a real directory tree.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crosslink_graph::{GraphConfig, ModuleGraph};
use crosslink_gomod::{GoMod, ReplaceOptions, discover, insert_replaces, prune_replaces};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> GoMod {
    GoMod::read(&root.join(rel)).unwrap()
}

/// root <- sdk <- exporters/otlp, plus an unrelated third-party requirement.
fn create_repo() -> TempDir {
    let dir = tempfile::Builder::new()
        .prefix("crosslink_test_")
        .tempdir()
        .expect("Failed to create temp directory");
    let root = dir.path();
    write(root, "go.mod", "module example.com/repo\n\ngo 1.22\n");
    write(
        root,
        "sdk/go.mod",
        "module example.com/repo/sdk\n\ngo 1.22\n\nrequire example.com/repo v0.1.0\n",
    );
    write(
        root,
        "exporters/otlp/go.mod",
        "module example.com/repo/exporters/otlp\n\ngo 1.22\n\nrequire (\n\texample.com/repo/sdk v0.1.0\n\tgoogle.golang.org/grpc v1.64.0\n)\n",
    );
    dir
}

fn graph_for(root: &Path) -> ModuleGraph {
    let discovery = discover(root).unwrap();
    ModuleGraph::build(&discovery.root_module, discovery.records, &GraphConfig::default()).unwrap()
}

#[test]
fn insert_adds_transitive_replaces() {
    let dir = create_repo();
    let root = dir.path();
    let graph = graph_for(root);

    let changes = insert_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    assert_eq!(changes.len(), 2);

    let otlp = read(root, "exporters/otlp/go.mod");
    assert_eq!(
        otlp.replace_for("example.com/repo").unwrap().new_path,
        "../.."
    );
    assert_eq!(
        otlp.replace_for("example.com/repo/sdk").unwrap().new_path,
        "../../sdk"
    );
    assert!(otlp.replace_for("google.golang.org/grpc").is_none());

    let sdk = read(root, "sdk/go.mod");
    assert_eq!(sdk.replace_for("example.com/repo").unwrap().new_path, "..");

    let top = read(root, "go.mod");
    assert!(top.replaces().is_empty());
}

#[test]
fn insert_is_idempotent() {
    let dir = create_repo();
    let root = dir.path();
    let graph = graph_for(root);

    insert_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    let before = fs::read_to_string(root.join("exporters/otlp/go.mod")).unwrap();
    let changes = insert_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    let after = fs::read_to_string(root.join("exporters/otlp/go.mod")).unwrap();

    assert!(changes.is_empty());
    assert_eq!(before, after);
}

#[test]
fn insert_respects_existing_replace_unless_overwrite() {
    let dir = create_repo();
    let root = dir.path();
    write(
        root,
        "sdk/go.mod",
        "module example.com/repo/sdk\n\nrequire example.com/repo v0.1.0\n\nreplace example.com/repo => ../fork\n",
    );
    let graph = graph_for(root);

    insert_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    assert_eq!(
        read(root, "sdk/go.mod").replace_for("example.com/repo").unwrap().new_path,
        "../fork"
    );

    let options = ReplaceOptions {
        overwrite: true,
        ..ReplaceOptions::default()
    };
    let changes = insert_replaces(root, &graph, &options).unwrap();
    let sdk_change = changes
        .iter()
        .find(|c| c.module == "example.com/repo/sdk")
        .unwrap();
    assert_eq!(sdk_change.overwritten, vec!["example.com/repo".to_string()]);
    assert_eq!(
        read(root, "sdk/go.mod").replace_for("example.com/repo").unwrap().new_path,
        ".."
    );
}

#[test]
fn insert_honours_exclusions() {
    let dir = create_repo();
    let root = dir.path();
    let graph = graph_for(root);
    let options = ReplaceOptions {
        exclude: ["example.com/repo/sdk".to_string()].into_iter().collect(),
        ..ReplaceOptions::default()
    };

    insert_replaces(root, &graph, &options).unwrap();

    assert!(read(root, "sdk/go.mod").replaces().is_empty());
    let otlp = read(root, "exporters/otlp/go.mod");
    assert!(otlp.replace_for("example.com/repo/sdk").is_none());
    assert!(otlp.replace_for("example.com/repo").is_some());
}

#[test]
fn prune_removes_stale_intra_repo_replaces_only() {
    let dir = create_repo();
    let root = dir.path();
    write(
        root,
        "sdk/go.mod",
        "module example.com/repo/sdk\n\nrequire example.com/repo v0.1.0\n\nreplace (\n\texample.com/repo => ..\n\texample.com/repo/removed => ../removed\n\tgoogle.golang.org/grpc => ../grpc-fork\n)\n",
    );
    let graph = graph_for(root);

    let changes = prune_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].removed, vec!["example.com/repo/removed".to_string()]);

    let sdk = read(root, "sdk/go.mod");
    assert!(sdk.replace_for("example.com/repo").is_some());
    assert!(sdk.replace_for("google.golang.org/grpc").is_some());
    assert!(sdk.replace_for("example.com/repo/removed").is_none());
}

#[test]
fn prune_after_insert_is_a_no_op() {
    let dir = create_repo();
    let root = dir.path();
    let graph = graph_for(root);

    insert_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    let changes = prune_replaces(root, &graph, &ReplaceOptions::default()).unwrap();
    assert!(changes.is_empty());
}
