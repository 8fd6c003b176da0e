//! End-to-end tests for the crosslink binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn crosslink(root: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("crosslink").unwrap();
    cmd.current_dir(root)
        .env_remove("CROSSLINK_ROOT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// root <- sdk <- exporters/otlp, plus an external requirement.
fn layered_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
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
        "module example.com/repo/exporters/otlp\n\ngo 1.22\n\nrequire (\n\texample.com/repo/sdk v0.1.0\n\tgoogle.golang.org/grpc v1.60.0\n)\n",
    );
    dir
}

/// a and b require each other.
fn cyclic_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "go.mod", "module example.com/repo\n\ngo 1.22\n");
    write(
        root,
        "a/go.mod",
        "module example.com/repo/a\n\nrequire example.com/repo/b v0.1.0\n",
    );
    write(
        root,
        "b/go.mod",
        "module example.com/repo/b\n\nrequire example.com/repo/a v0.1.0\n",
    );
    dir
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    crosslink(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("crosslink"));
}

#[test]
fn test_tidylist_orders_dependencies_first() {
    let dir = layered_repo();
    crosslink(dir.path())
        .args(["tidylist", "--output", "tidy.txt", "--verify"])
        .assert()
        .success();

    let schedule = fs::read_to_string(dir.path().join("tidy.txt")).unwrap();
    assert_eq!(schedule, ".\n./sdk\n./exporters/otlp");
}

#[test]
fn test_tidylist_root_flag() {
    let dir = layered_repo();
    let out = TempDir::new().unwrap();
    let output = out.path().join("tidy.txt");
    crosslink(out.path())
        .arg("--root")
        .arg(dir.path())
        .arg("tidylist")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    assert!(fs::read_to_string(output).unwrap().starts_with(".\n"));
}

#[test]
fn test_tidylist_rejects_undeclared_cycle() {
    let dir = cyclic_repo();
    crosslink(dir.path())
        .args(["tidylist", "--output", "tidy.txt"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("allowlist mismatch"));
    assert!(!dir.path().join("tidy.txt").exists());
}

#[test]
fn test_tidylist_with_allowlist_expands_cycle() {
    let dir = cyclic_repo();
    write(
        dir.path(),
        "allow-circular.txt",
        "# known cycles\nexample.com/repo/a\nexample.com/repo/b\n",
    );
    crosslink(dir.path())
        .args([
            "tidylist",
            "--output",
            "tidy.txt",
            "--allow-circular",
            "allow-circular.txt",
            "--verify",
        ])
        .assert()
        .success();

    let schedule = fs::read_to_string(dir.path().join("tidy.txt")).unwrap();
    assert_eq!(schedule, ".\n./b\n./a\n./b");
}

#[test]
fn test_tidylist_rejects_stale_allowlist_entry() {
    let dir = layered_repo();
    write(dir.path(), "allow-circular.txt", "example.com/repo/sdk\n");
    crosslink(dir.path())
        .args([
            "tidylist",
            "--output",
            "tidy.txt",
            "--allow-circular",
            "allow-circular.txt",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("example.com/repo/sdk"));
}

#[test]
fn test_tidylist_reads_config_file() {
    let dir = cyclic_repo();
    write(dir.path(), "tools/allow.txt", "example.com/repo/a\nexample.com/repo/b\n");
    write(
        dir.path(),
        "crosslink.toml",
        "allow_circular = \"tools/allow.txt\"\nverify = true\n",
    );
    crosslink(dir.path())
        .args(["tidylist", "-o", "tidy.txt"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("tidy.txt")).unwrap(),
        ".\n./b\n./a\n./b"
    );
}

#[test]
fn test_tidylist_skip_list() {
    let dir = cyclic_repo();
    write(dir.path(), "skip.txt", "./b\n");
    crosslink(dir.path())
        .args(["tidylist", "--output", "tidy.txt", "--skip", "skip.txt"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("tidy.txt")).unwrap(),
        ".\n./a"
    );
}

#[test]
fn test_missing_root_manifest_is_config_error() {
    let dir = TempDir::new().unwrap();
    crosslink(dir.path())
        .args(["tidylist", "--output", "tidy.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No root go.mod"));
}

#[test]
fn test_invalid_config_file_is_config_error() {
    let dir = layered_repo();
    write(dir.path(), "crosslink.toml", "allow = \"typo\"\n");
    crosslink(dir.path())
        .arg("graph")
        .assert()
        .code(2);
}

#[test]
fn test_insert_then_prune() {
    let dir = layered_repo();
    crosslink(dir.path()).arg("insert").assert().success();

    let otlp = fs::read_to_string(dir.path().join("exporters/otlp/go.mod")).unwrap();
    assert!(otlp.contains("example.com/repo => ../.."));
    assert!(otlp.contains("example.com/repo/sdk => ../../sdk"));
    let sdk = fs::read_to_string(dir.path().join("sdk/go.mod")).unwrap();
    assert!(sdk.contains("replace example.com/repo => ..\n"));

    // Drop the sdk dependency on the root; its replace becomes stale.
    write(
        dir.path(),
        "sdk/go.mod",
        &sdk.replace("require example.com/repo v0.1.0\n", ""),
    );
    crosslink(dir.path()).arg("prune").assert().success();

    let sdk = fs::read_to_string(dir.path().join("sdk/go.mod")).unwrap();
    assert!(!sdk.contains("replace"));
}

#[test]
fn test_insert_respects_exclude() {
    let dir = layered_repo();
    crosslink(dir.path())
        .args(["insert", "--exclude", "example.com/repo/sdk"])
        .assert()
        .success();

    let sdk = fs::read_to_string(dir.path().join("sdk/go.mod")).unwrap();
    assert!(!sdk.contains("replace"));
    let otlp = fs::read_to_string(dir.path().join("exporters/otlp/go.mod")).unwrap();
    assert!(otlp.contains("example.com/repo => ../.."));
    assert!(!otlp.contains("example.com/repo/sdk =>"));
}

#[test]
fn test_work_writes_go_work() {
    let dir = layered_repo();
    crosslink(dir.path())
        .args(["work", "--go", "1.23"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("go.work")).unwrap(),
        "go 1.23\n\nuse (\n\t.\n\t./exporters/otlp\n\t./sdk\n)\n"
    );
}

#[test]
fn test_graph_prints_dot() {
    let dir = layered_repo();
    crosslink(dir.path())
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph"))
        .stdout(predicate::str::contains("example.com/repo/exporters/otlp"))
        .stdout(predicate::str::contains("google.golang.org").not());
}

#[test]
fn test_json_logs_go_to_stderr() {
    let dir = layered_repo();
    crosslink(dir.path())
        .args(["--log-format", "json", "-L", "info", "tidylist", "-o", "tidy.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Wrote tidy schedule"));
}
