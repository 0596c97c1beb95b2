//! End-to-end tests for the timepin CLI
//!
//! These tests verify:
//! - `report` prints one line per spec in input order
//! - `pin` prints, writes and diffs pinned manifests
//! - Exit codes are correct for failures

use assert_cmd::Command;
use mockito::{Server, ServerGuard};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

/// Registry address nothing listens on; used when no request should be made
const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:9";

fn timepin(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_timepin"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn registry_with(packages: &[&str]) -> ServerGuard {
    let mut server = Server::new();
    for name in packages {
        let body = json!({
            "name": name,
            "time": {
                "created": "2015-01-01T00:00:00.000Z",
                "1.0.0": "2015-01-01T00:00:00.000Z",
                "1.2.0": "2016-01-01T00:00:00.000Z",
                "2.0.0": "2018-01-01T00:00:00.000Z"
            }
        });
        server
            .mock("GET", format!("/{}", name).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();
    }
    server
}

fn create_test_project(dir: &TempDir) {
    let package_json = r#"{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": {
    "alpha": "^1.0.0",
    "beta": "^2.0.0"
  },
  "devDependencies": {
    "gamma": "*"
  }
}"#;
    fs::write(dir.path().join("package.json"), package_json).unwrap();
}

mod report_tests {
    use super::*;

    #[test]
    fn test_report_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let server = registry_with(&["alpha", "beta"]);

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q"])
            .args(["report", "2017-01-01", "beta@^1.0.0", "alpha", "alpha@^2.0.0"])
            .assert()
            .success()
            .stdout(
                "beta@^1.0.0 resolved to \"1.2.0\" at 2017-01-01\n\
                 alpha@* resolved to \"1.2.0\" at 2017-01-01\n\
                 alpha@^2.0.0 resolved to \"null\" at 2017-01-01\n",
            );
    }

    #[test]
    fn test_report_accepts_year_only_timestamp() {
        let dir = TempDir::new().unwrap();
        let server = registry_with(&["alpha"]);

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q"])
            .args(["report", "2017", "alpha"])
            .assert()
            .success()
            .stdout("alpha@* resolved to \"1.2.0\" at 2017\n");
    }

    #[test]
    fn test_report_invalid_timestamp() {
        let dir = TempDir::new().unwrap();

        timepin(&dir)
            .args(["--registry", UNREACHABLE_REGISTRY, "-q"])
            .args(["report", "yesterday-ish", "alpha"])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(
                "could not parse timestamp: \"yesterday-ish\"",
            ));
    }

    #[test]
    fn test_report_scoped_spec_rejected() {
        let dir = TempDir::new().unwrap();

        timepin(&dir)
            .args(["--registry", UNREACHABLE_REGISTRY, "-q"])
            .args(["report", "2017-01-01", "@scope/pkg@1.0.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid dependency spec"));
    }

    #[test]
    fn test_report_unknown_package() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new();
        server.mock("GET", "/ghost").with_status(404).create();

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "--retries", "0", "-q"])
            .args(["report", "2017-01-01", "ghost"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("'ghost' not found"));
    }

    #[test]
    fn test_report_uses_npmrc_registry() {
        let dir = TempDir::new().unwrap();
        let server = registry_with(&["alpha"]);
        fs::write(dir.path().join(".npmrc"), format!("registry={}/\n", server.url())).unwrap();

        timepin(&dir)
            .args(["-q", "report", "2030-01-01", "alpha"])
            .assert()
            .success()
            .stdout("alpha@* resolved to \"2.0.0\" at 2030-01-01\n");
    }
}

mod pin_tests {
    use super::*;

    #[test]
    fn test_pin_prints_json() {
        let dir = TempDir::new().unwrap();
        create_test_project(&dir);
        let server = registry_with(&["alpha", "beta", "gamma"]);

        let output = timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q", "pin", "2017-01-01"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let pinned: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            pinned,
            json!({
                "name": "test-project",
                "version": "1.0.0",
                "dependencies": {"alpha": "1.2.0", "beta": null},
                "devDependencies": {"gamma": "1.2.0"}
            })
        );
    }

    #[test]
    fn test_pin_write_keeps_field_layout() {
        let dir = TempDir::new().unwrap();
        create_test_project(&dir);
        let server = registry_with(&["alpha", "beta", "gamma"]);

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q"])
            .args(["pin", "2030-01-01", "--write"])
            .assert()
            .success();

        let written = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(
            written,
            r#"{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": {
    "alpha": "1.2.0",
    "beta": "2.0.0"
  },
  "devDependencies": {
    "gamma": "2.0.0"
  }
}
"#
        );
    }

    #[test]
    fn test_pin_rereads_its_own_output() {
        let dir = TempDir::new().unwrap();
        create_test_project(&dir);
        let server = registry_with(&["alpha", "beta", "gamma"]);

        for _ in 0..2 {
            timepin(&dir)
                .args(["--registry", server.url().as_str(), "-q"])
                .args(["pin", "2017-01-01", "--write"])
                .assert()
                .success();
        }

        let written: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap())
                .unwrap();
        assert_eq!(written["dependencies"]["alpha"], "1.2.0");
        assert_eq!(written["dependencies"]["beta"], "1.2.0");
    }

    #[test]
    fn test_pin_without_write_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        create_test_project(&dir);
        let before = fs::read_to_string(dir.path().join("package.json")).unwrap();
        let server = registry_with(&["alpha", "beta", "gamma"]);

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q", "pin", "2017-01-01"])
            .assert()
            .success();

        let after = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_pin_write_rewrites_file() {
        let dir = TempDir::new().unwrap();
        create_test_project(&dir);
        let server = registry_with(&["alpha", "beta", "gamma"]);

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q"])
            .args(["pin", "2030-01-01", "package.json", "--write"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let written: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap())
                .unwrap();
        assert_eq!(written["dependencies"]["alpha"], "1.2.0");
        assert_eq!(written["dependencies"]["beta"], "2.0.0");
        assert_eq!(written["devDependencies"]["gamma"], "2.0.0");
        assert_eq!(written["name"], "test-project");
    }

    #[test]
    fn test_pin_diff_output() {
        let dir = TempDir::new().unwrap();
        create_test_project(&dir);
        let server = registry_with(&["alpha", "beta", "gamma"]);

        timepin(&dir)
            .args(["--registry", server.url().as_str(), "-q"])
            .args(["pin", "2017-01-01", "--diff"])
            .assert()
            .success()
            .stdout(
                "dependencies alpha: ^1.0.0 -> 1.2.0\n\
                 dependencies beta: ^2.0.0 -> null\n\
                 devDependencies gamma: * -> 1.2.0\n\
                 # 2 package(s) pinned, 1 unresolved\n",
            );
    }

    #[test]
    fn test_pin_missing_manifest() {
        let dir = TempDir::new().unwrap();

        timepin(&dir)
            .args(["--registry", UNREACHABLE_REGISTRY, "-q", "pin", "2017-01-01"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("failed to read manifest file"));
    }

    #[test]
    fn test_pin_rejects_array_bundled_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "x", "bundledDependencies": ["alpha"]}"#,
        )
        .unwrap();

        timepin(&dir)
            .args(["--registry", UNREACHABLE_REGISTRY, "-q", "pin", "2017-01-01"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("bundledDependencies"));
    }
}

mod exit_code_tests {
    use super::*;

    #[test]
    fn test_exit_code_help() {
        let dir = TempDir::new().unwrap();
        timepin(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("report").and(predicate::str::contains("pin")));
    }

    #[test]
    fn test_exit_code_version() {
        let dir = TempDir::new().unwrap();
        timepin(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_invalid_registry_flag() {
        let dir = TempDir::new().unwrap();
        timepin(&dir)
            .args(["--registry", "ftp://example.com", "report", "2017-01-01", "alpha"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("invalid registry URL"));
    }
}
