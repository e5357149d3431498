/*!
 * Command-line integration tests
 */

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_file(root: &Path, rel_path: &str, content: &str) {
    let path = root.join(rel_path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_repo() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "README.md", "# Readme\n");
    write_file(dir.path(), "src/main.rs", "fn main() {}\n");
    write_file(dir.path(), "src/util/mod.rs", "pub fn util() {}\n");
    write_file(dir.path(), "build/out.log", "noise\n");
    write_file(dir.path(), ".git/HEAD", "ref: refs/heads/main\n");
    dir
}

fn flattener() -> Command {
    Command::cargo_bin("repo-flattener").unwrap()
}

#[test]
fn test_flattens_repository() {
    let repo = setup_repo();
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    flattener()
        .arg(repo.path())
        .arg("--output")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("FLATTENING COMPLETE"));

    let mut names: Vec<String> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "README.md",
            "build_out.log",
            "file_manifest.txt",
            "src_main.rs",
            "src_util_mod.rs"
        ]
    );

    let content = fs::read_to_string(output_dir.join("src_util_mod.rs")).unwrap();
    assert_eq!(content, "// FILE: src/util/mod.rs\n\npub fn util() {}\n");

    let manifest = fs::read_to_string(output_dir.join("file_manifest.txt")).unwrap();
    assert_eq!(
        manifest,
        "Repository structure:\n\nREADME.md\nbuild\n    out.log\nsrc\n    main.rs\n    util\n        mod.rs\n"
    );
}

#[test]
fn test_extra_ignores() {
    let repo = setup_repo();
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    flattener()
        .arg(repo.path())
        .args(["--ignore-dirs", "build,util", "--ignore-exts", ".md"])
        .arg("-o")
        .arg(&output_dir)
        .assert()
        .success();

    assert!(output_dir.join("src_main.rs").exists());
    assert!(!output_dir.join("README.md").exists());
    assert!(!output_dir.join("build_out.log").exists());
    assert!(!output_dir.join("src_util_mod.rs").exists());
}

#[test]
fn test_config_file_in_repo() {
    let repo = setup_repo();
    write_file(repo.path(), ".repo-flattener.yml", "ignore_dirs: [build]\n");
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    flattener()
        .arg(repo.path())
        .arg("-o")
        .arg(&output_dir)
        .assert()
        .success();

    assert!(!output_dir.join("build_out.log").exists());
    assert!(output_dir.join(".repo-flattener.yml").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let repo = setup_repo();
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    flattener()
        .arg(repo.path())
        .arg("-o")
        .arg(&output_dir)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains(".rs"));

    assert!(!output_dir.exists());
}

#[test]
fn test_explicit_files() {
    let repo = setup_repo();
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    flattener()
        .arg(repo.path())
        .args(["--files", "src/main.rs,missing.rs"])
        .arg("-o")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("missing.rs"));

    assert!(output_dir.join("src_main.rs").exists());
    assert!(!output_dir.join("README.md").exists());
    let manifest = fs::read_to_string(output_dir.join("file_manifest.txt")).unwrap();
    assert!(manifest.contains("missing.rs"));
}

#[test]
fn test_traversal_is_rejected() {
    let repo = setup_repo();
    let out = tempdir().unwrap();

    flattener()
        .arg(repo.path())
        .args(["--files", "../etc/passwd"])
        .arg("-o")
        .arg(out.path().join("flat"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("path traversal"));
}

#[test]
fn test_missing_repository() {
    let out = tempdir().unwrap();

    flattener()
        .arg(out.path().join("does-not-exist"))
        .arg("-o")
        .arg(out.path().join("flat"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("path does not exist"))
        .stderr(predicate::str::contains("Tip: Make sure the path exists"));

    assert!(!out.path().join("flat").exists());
}

#[test]
fn test_interactive_selection() {
    let repo = setup_repo();
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    // sorted: README.md, build/out.log, src/main.rs, src/util/mod.rs
    flattener()
        .arg(repo.path())
        .arg("-i")
        .arg("-o")
        .arg(&output_dir)
        .write_stdin("none\nt 3\ndone\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Proceeding with 1 selected files."));

    let mut names: Vec<String> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["file_manifest.txt", "src_main.rs"]);
}

#[test]
fn test_interactive_quit() {
    let repo = setup_repo();
    let out = tempdir().unwrap();
    let output_dir = out.path().join("flat");

    flattener()
        .arg(repo.path())
        .arg("-i")
        .arg("-o")
        .arg(&output_dir)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled by user."));

    assert!(!output_dir.exists());
}

#[test]
fn test_generate_completions() {
    flattener()
        .args(["--generate", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-flattener"));
}
