//! End-to-end tests for the depsync binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a local repository with one commit, returning its path and id.
fn setup_remote(temp: &TempDir) -> (PathBuf, String) {
    let remote = temp.path().join("remote");
    fs::create_dir_all(&remote).unwrap();
    git(&remote, &["init"]);
    git(&remote, &["config", "user.email", "test@example.com"]);
    git(&remote, &["config", "user.name", "Test User"]);
    fs::write(remote.join("README.md"), "# test").unwrap();
    git(&remote, &["add", "README.md"]);
    git(&remote, &["commit", "-m", "initial"]);
    let revision = git_stdout(&remote, &["rev-parse", "HEAD"]);
    (remote, revision)
}

fn write_manifest(temp: &TempDir, entries: &[(&str, &Path, &str)]) -> PathBuf {
    let mut content = String::new();
    for (name, url, revision) in entries {
        content.push_str(&format!(
            "[[dependency]]\nname = \"{}\"\nurl = \"{}\"\nrevision = \"{}\"\n\n",
            name,
            url.display(),
            revision
        ));
    }
    let manifest = temp.path().join("depsync.toml");
    fs::write(&manifest, content).unwrap();
    manifest
}

fn depsync() -> Command {
    Command::cargo_bin("depsync").unwrap()
}

#[test]
fn test_sync_reports_missing_manifest() {
    let temp = TempDir::new().unwrap();

    depsync()
        .current_dir(temp.path())
        .args(["sync", "--manifest", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read manifest"));
}

#[test]
fn test_sync_clones_declared_dependency() {
    let temp = TempDir::new().unwrap();
    let (remote, revision) = setup_remote(&temp);
    let root = temp.path().join("modules");
    fs::create_dir_all(&root).unwrap();
    let manifest = write_manifest(&temp, &[("interfaces", &remote, &revision)]);

    depsync()
        .args([
            "sync",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("fetched and checked out"));

    assert!(root.join("interfaces").join(".git").exists());
    assert!(root.join("interfaces").join("README.md").exists());

    // a second run is a no-op
    depsync()
        .args([
            "sync",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("already at pinned revision"));
}

#[test]
fn test_sync_duplicate_names_fail_before_any_clone() {
    let temp = TempDir::new().unwrap();
    let (remote, revision) = setup_remote(&temp);
    let root = temp.path().join("modules");
    fs::create_dir_all(&root).unwrap();
    let manifest = write_manifest(
        &temp,
        &[
            ("interfaces", &remote, &revision),
            ("interfaces", &remote, &revision),
        ],
    );

    depsync()
        .args([
            "sync",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate dependency name"));

    assert!(!root.join("interfaces").exists());
}

#[test]
fn test_sync_reports_unreachable_remote_but_exits_nonzero_only_overall() {
    let temp = TempDir::new().unwrap();
    let (remote, revision) = setup_remote(&temp);
    let missing = temp.path().join("no-such-remote");
    let root = temp.path().join("modules");
    fs::create_dir_all(&root).unwrap();
    let manifest = write_manifest(
        &temp,
        &[
            ("interfaces", &remote, &revision),
            ("audio", &missing, "bca2b9f3"),
        ],
    );

    depsync()
        .args([
            "sync",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("fetch failed"));

    // the healthy record was still synchronized
    assert!(root.join("interfaces").join(".git").exists());
    assert!(!root.join("audio").exists());
}

#[test]
fn test_sync_json_output() {
    let temp = TempDir::new().unwrap();
    let (remote, revision) = setup_remote(&temp);
    let root = temp.path().join("modules");
    fs::create_dir_all(&root).unwrap();
    let manifest = write_manifest(&temp, &[("interfaces", &remote, &revision)]);

    depsync()
        .args([
            "sync",
            "--json",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": "synced""#));
}

#[test]
fn test_check_reports_missing_without_fetching() {
    let temp = TempDir::new().unwrap();
    let (remote, revision) = setup_remote(&temp);
    let root = temp.path().join("modules");
    fs::create_dir_all(&root).unwrap();
    let manifest = write_manifest(&temp, &[("interfaces", &remote, &revision)]);

    depsync()
        .args([
            "check",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("not fetched yet"));

    // check never clones
    assert!(!root.join("interfaces").exists());
}

#[test]
fn test_check_after_sync_reports_no_drift() {
    let temp = TempDir::new().unwrap();
    let (remote, revision) = setup_remote(&temp);
    let root = temp.path().join("modules");
    fs::create_dir_all(&root).unwrap();
    let manifest = write_manifest(&temp, &[("interfaces", &remote, &revision)]);

    depsync()
        .args([
            "sync",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .success();

    depsync()
        .args([
            "check",
            "--manifest",
            manifest.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drift detected"));
}
