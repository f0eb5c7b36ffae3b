//! Integration tests for the `expand` and `tree` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use super::{PRODUCT, PRODUCT_REPO_REVISION, PRODUCT_REPO_URL, fixture_catalog};

/// The binary isolated from any user configuration and without colors.
fn bc_hierarchy(temp: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bc-hierarchy").unwrap();
    cmd.env("BCH_CONFIG_PATH", temp.join("missing-config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn expand_product(temp: &Path) -> Command {
    let mut cmd = bc_hierarchy(temp);
    cmd.arg("expand")
        .arg("--catalog")
        .arg(fixture_catalog())
        .args(["--gav", PRODUCT])
        .args(["--scm-url", PRODUCT_REPO_URL])
        .args(["--scm-revision", PRODUCT_REPO_REVISION]);
    cmd
}

#[test]
fn test_expand_prints_tree() {
    let temp = TempDir::new().unwrap();

    expand_product(temp.path())
        .args(["--levels", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.acme:product:1.0 [ANALYSED] bc: 7"))
        .stdout(predicate::str::contains("org.acme:lib:2.0 [ANALYSED] bc: 42 built: 2.0.redhat-3"))
        .stdout(predicate::str::contains(
            "org.acme:legacy:0.9 [FAILED] errors: NO_DEPENDENCY, POM_EXCEPTION",
        ))
        .stdout(predicate::str::contains("6 nodes, 1 failed"));
}

#[test]
fn test_expand_json_output() {
    let temp = TempDir::new().unwrap();

    let output = expand_product(temp.path())
        .args(["--format", "json", "--quiet"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["analysisStatus"], "ANALYSED");
    assert_eq!(json["project"]["gav"]["artifactId"], "product");
    assert_eq!(json["dependencies"].as_array().unwrap().len(), 3);
}

#[test]
fn test_expand_continues_from_state() {
    let temp = TempDir::new().unwrap();
    let state = temp.path().join("product.json");

    expand_product(temp.path())
        .arg("--state")
        .arg(&state)
        .arg("--quiet")
        .assert()
        .success();
    assert!(state.exists());

    // expand only util one level further
    bc_hierarchy(temp.path())
        .arg("expand")
        .arg("--catalog")
        .arg(fixture_catalog())
        .arg("--state")
        .arg(&state)
        .args(["--select", "org.acme:util:3.0", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.acme:util:3.0 [ANALYSED]"))
        .stdout(predicate::str::contains("org.acme:lib:2.0 [NOT_ANALYSED]"))
        .stdout(predicate::str::contains("5 nodes, 0 failed"));

    bc_hierarchy(temp.path())
        .arg("tree")
        .arg("--state")
        .arg(&state)
        .args(["--depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("├── org.acme:legacy:0.9"))
        .stdout(predicate::str::contains("org.acme:core:1.1").not());
}

#[test]
fn test_expand_with_explicit_dependencies() {
    let temp = TempDir::new().unwrap();

    expand_product(temp.path())
        .args(["--deps", "org.acme:core:1.1,org.acme:util:3.0", "--levels", "0", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.acme:core:1.1 [NOT_ANALYSED]"))
        .stdout(predicate::str::contains("org.acme:lib:2.0").not())
        .stdout(predicate::str::contains("3 nodes, 0 failed"));
}

#[test]
fn test_expand_without_gav_fails() {
    let temp = TempDir::new().unwrap();

    bc_hierarchy(temp.path())
        .arg("expand")
        .arg("--catalog")
        .arg(fixture_catalog())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--gav is required"));
}

#[test]
fn test_invalid_gav_is_rejected() {
    let temp = TempDir::new().unwrap();

    bc_hierarchy(temp.path())
        .arg("expand")
        .arg("--catalog")
        .arg(fixture_catalog())
        .args(["--gav", "org.acme:product"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("group:artifact:version"));
}

#[test]
fn test_scm_url_requires_revision() {
    let temp = TempDir::new().unwrap();

    bc_hierarchy(temp.path())
        .arg("expand")
        .arg("--catalog")
        .arg(fixture_catalog())
        .args(["--gav", PRODUCT, "--scm-url", PRODUCT_REPO_URL])
        .assert()
        .failure();
}

#[test]
fn test_invalid_catalog_reports_file() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("broken.toml");
    fs::write(&catalog, "[[artifacts]]\ngav = \"nope\"\n").unwrap();

    bc_hierarchy(temp.path())
        .arg("expand")
        .arg("--catalog")
        .arg(&catalog)
        .args(["--gav", PRODUCT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid catalog file"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "[expansion]\nmax-parallel = 0\n").unwrap();

    expand_product(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_tree_missing_state_fails() {
    let temp = TempDir::new().unwrap();

    bc_hierarchy(temp.path())
        .arg("tree")
        .arg("--state")
        .arg(temp.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read hierarchy state"));
}
