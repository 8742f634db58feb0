//! End-to-end tests of the `infrakit` binary.
//!
//! Every test runs against a scratch config file and base directory with the
//! prerequisite gate skipped, so no docker daemon is needed.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("infrakit.toml"), "").unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("infrakit.toml")
    }

    fn base(&self) -> PathBuf {
        self.dir.path().join("stack")
    }

    /// Runs with the prerequisite gate active.
    fn gated_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("infrakit").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.config())
            .arg("--base-dir")
            .arg(self.base());
        cmd
    }

    fn cmd(&self) -> Command {
        let mut cmd = self.gated_cmd();
        cmd.arg("--skip-checks");
        cmd
    }
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn help_lists_every_verb() {
    let mut cmd = Command::cargo_bin("infrakit").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("prereq"));
}

#[test]
fn version_flag() {
    let mut cmd = Command::cargo_bin("infrakit").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_color_env_accepts_numeric_values() {
    let sandbox = Sandbox::new();
    for value in ["1", "0", "true"] {
        sandbox
            .cmd()
            .env("NO_COLOR", value)
            .args(["list", "infra", "--format", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("postgres"));
    }
}

#[test]
fn missing_docker_blocks_catalog_verbs() {
    let sandbox = Sandbox::new();
    sandbox
        .gated_cmd()
        .env("PATH", "")
        .args(["setup", "infra", "redis"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("docker"));

    assert!(!sandbox.base().exists());
}

#[test]
fn unknown_names_are_reported_before_the_gate() {
    let sandbox = Sandbox::new();
    sandbox
        .gated_cmd()
        .env("PATH", "")
        .args(["start", "infra", "doesnotexist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("doesnotexist"));
}

#[test]
fn list_needs_no_prerequisites() {
    let sandbox = Sandbox::new();
    sandbox
        .gated_cmd()
        .env("PATH", "")
        .args(["list", "monitoring", "--format", "list"])
        .assert()
        .success()
        .stdout("grafana\nprometheus\nloki\ntempo\n");
}

#[test]
fn setup_writes_instance_directory() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["setup", "infra", "postgres"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postgres"));

    let root = sandbox.base().join("infra/postgres");
    assert!(read(root.join("docker-compose.yml")).contains("postgres:16"));
    assert!(read(root.join(".env")).contains("POSTGRES_PORT=5432"));
    assert!(root.join("config/init.sql").is_file());
    assert!(root.join("volumes").is_dir());
    assert!(root.join("data").is_dir());
}

#[test]
fn setup_all_monitoring() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["setup", "monitoring", "--all"])
        .assert()
        .success();

    for name in ["grafana", "prometheus", "loki", "tempo"] {
        assert!(
            sandbox
                .base()
                .join("monitoring")
                .join(name)
                .join("docker-compose.yml")
                .is_file(),
            "{name} not generated"
        );
    }
}

#[test]
fn unknown_resource_is_a_user_error_and_writes_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["setup", "infra", "postgres", "doesnotexist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("doesnotexist"));

    assert!(!sandbox.base().exists());
}

#[test]
fn unknown_catalog_is_a_user_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["setup", "databases", "redis"])
        .assert()
        .code(2);
}

#[test]
fn duplicate_names_are_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["setup", "infra", "redis", "redis"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("more than once"));
}

#[test]
fn setup_json_reports_each_resource() {
    let sandbox = Sandbox::new();
    let out = sandbox
        .cmd()
        .args(["--output-format", "json", "setup", "infra", "redis", "mongodb"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let outcomes = report["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["name"], "redis");
    assert_eq!(outcomes[0]["outcome"], "done");
    assert_eq!(outcomes[1]["name"], "mongodb");
}

#[test]
fn stop_of_never_set_up_resource_is_skipped() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["stop", "infra", "redis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not set up"));
}

#[test]
fn status_of_empty_catalog() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["status", "monitoring"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No monitoring instances"));
}

#[test]
fn list_json_has_both_catalogs() {
    let sandbox = Sandbox::new();
    let out = sandbox
        .cmd()
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let listed: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    assert_eq!(listed.len(), 9);
    assert_eq!(listed[0]["catalog"], "infra");
    assert_eq!(listed[0]["name"], "postgres");
    assert_eq!(listed[8]["catalog"], "monitoring");
    assert_eq!(listed[8]["set_up"], false);
}

#[test]
fn list_names_of_one_catalog() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["list", "infra", "--format", "list"])
        .assert()
        .success()
        .stdout("postgres\nredis\nrabbitmq\nmongodb\nclickhouse\n");
}

#[test]
fn config_values_come_from_file_and_env() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.config(), "[runtime]\nnetwork = \"lab-net\"\n").unwrap();

    sandbox
        .cmd()
        .args(["config", "get", "runtime.network"])
        .assert()
        .success()
        .stdout("lab-net\n");

    sandbox
        .cmd()
        .env("INFRAKIT_RUNTIME__BINARY", "podman")
        .args(["config", "get", "runtime.binary"])
        .assert()
        .success()
        .stdout("podman\n");
}

#[test]
fn config_unknown_key_is_configuration_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "get", "runtime.nope"])
        .assert()
        .code(4);
}

#[test]
fn config_path_prints_active_file() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("infrakit.toml"));
}

#[test]
fn malformed_config_exits_four() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.config(), "[runtime\n").unwrap();
    sandbox.cmd().args(["list"]).assert().code(4);
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let sandbox = Sandbox::new();
    sandbox.cmd().arg("init").assert().code(2);
    sandbox.cmd().args(["init", "--force"]).assert().success();

    let written = read(sandbox.config());
    assert!(written.contains("[runtime]"));
    assert!(written.contains("infrakit-net"));
}

#[test]
fn init_creates_missing_config() {
    let sandbox = Sandbox::new();
    let fresh = sandbox.dir.path().join("nested/new.toml");

    let mut cmd = Command::cargo_bin("infrakit").unwrap();
    cmd.current_dir(sandbox.dir.path())
        .arg("--config")
        .arg(&fresh)
        .arg("init")
        .assert()
        .success();

    assert!(read(&fresh).contains("[prerequisites]"));
}

#[test]
fn completions_for_bash() {
    let mut cmd = Command::cargo_bin("infrakit").unwrap();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("infrakit"));
}

#[test]
fn log_file_receives_events() {
    let sandbox = Sandbox::new();
    let log = sandbox.dir.path().join("logs/infrakit.log");
    sandbox
        .cmd()
        .arg("-v")
        .arg("--log-file")
        .arg(&log)
        .args(["setup", "infra", "redis"])
        .assert()
        .success();

    assert!(read(&log).contains("redis"));
}
