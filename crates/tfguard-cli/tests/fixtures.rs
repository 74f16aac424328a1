//! End-to-end CLI integration tests using test fixtures.
//!
//! Each fixture in `tests/fixtures/` contains:
//! - A graph.json block graph as the parser would hand it over
//! - An expected.json with the verdict, exit code and failing resources
//!
//! These tests run the CLI against each fixture and verify:
//! 1. Exit code matches expected (0=pass, 2=fail)
//! 2. The report's verdict and failing resources match

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a Command for the tfguard binary.
/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn tfguard_cmd() -> Command {
    Command::cargo_bin("tfguard").expect("tfguard binary not found - run `cargo build` first")
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tfguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Run the CLI check command against a fixture and return the exit code and JSON report.
fn run_check_on_fixture(fixture_name: &str, extra: &[&str]) -> (i32, Value) {
    let graph_path = fixtures_dir().join(fixture_name).join("graph.json");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = tfguard_cmd()
        .current_dir(temp_dir.path())
        .args(extra)
        .arg("check")
        .arg("--graph")
        .arg(&graph_path)
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("Failed to run command");

    let exit_code = output.status.code().unwrap_or(-1);
    let report_content = std::fs::read_to_string(&report_path).expect("Failed to read report");
    let report: Value = serde_json::from_str(&report_content).expect("Failed to parse report JSON");

    (exit_code, report)
}

fn load_expected(fixture_name: &str) -> Value {
    let path = fixtures_dir().join(fixture_name).join("expected.json");
    let content = std::fs::read_to_string(&path).expect("Failed to read expected.json");
    serde_json::from_str(&content).expect("Failed to parse expected.json")
}

fn failed_resources(report: &Value) -> Vec<String> {
    let mut failed: Vec<String> = report["results"]
        .as_array()
        .expect("results array")
        .iter()
        .filter(|r| r["status"] == "fail")
        .map(|r| r["resource"].as_str().expect("resource").to_string())
        .collect();
    failed.sort();
    failed
}

fn assert_fixture(fixture_name: &str) {
    let (exit_code, report) = run_check_on_fixture(fixture_name, &[]);
    let expected = load_expected(fixture_name);

    assert_eq!(
        i64::from(exit_code),
        expected["exit_code"].as_i64().expect("exit_code"),
        "exit code for fixture '{fixture_name}'"
    );
    assert_eq!(report["verdict"], expected["verdict"], "verdict for '{fixture_name}'");

    let expected_failed: Vec<String> =
        serde_json::from_value(expected["failed_resources"].clone()).expect("failed_resources");
    assert_eq!(
        failed_resources(&report),
        expected_failed,
        "failing resources for '{fixture_name}'"
    );
}

// ============================================================================
// Fixture tests
// ============================================================================

#[test]
fn fixture_rdp_open_fails() {
    assert_fixture("rdp_open");
}

#[test]
fn fixture_rdp_deny_passes() {
    assert_fixture("rdp_deny");
}

#[test]
fn fixture_rdp_restricted_passes() {
    assert_fixture("rdp_restricted");
}

#[test]
fn fixture_nsg_mixed_flags_only_the_open_rule() {
    assert_fixture("nsg_mixed");
}

#[test]
fn fixture_reference_hop_fails() {
    assert_fixture("reference_hop");
}

#[test]
fn fixture_reference_cycle_has_no_rdp_verdict() {
    assert_fixture("reference_cycle");

    let (_, report) = run_check_on_fixture("reference_cycle", &[]);
    let rdp = report["results"]
        .as_array()
        .expect("results")
        .iter()
        .filter(|r| r["rule_code"] == "AZU024")
        .count();
    assert_eq!(rdp, 0);
}

#[test]
fn fixture_multi_provider() {
    assert_fixture("multi_provider");
}

// ============================================================================
// Report shape
// ============================================================================

#[test]
fn report_has_schema_tool_and_summary() {
    let (_, report) = run_check_on_fixture("rdp_open", &[]);
    assert_eq!(report["schema"], "tfguard.report.v1");
    assert_eq!(report["tool"]["name"], "tfguard");
    assert_eq!(report["summary"]["profile"], "strict");
    assert_eq!(report["summary"]["completion"]["state"], "complete");
    assert!(report["started_at"].as_str().is_some());
}

#[test]
fn failing_results_carry_location_and_fingerprint() {
    let (_, report) = run_check_on_fixture("rdp_open", &[]);
    let fail = report["results"]
        .as_array()
        .expect("results")
        .iter()
        .find(|r| r["status"] == "fail")
        .expect("a failure");
    assert_eq!(fail["location"]["path"], "network.tf");
    assert_eq!(fail["location"]["start_line"], 1);
    assert_eq!(fail["fingerprint"].as_str().map(str::len), Some(64));
}

#[test]
fn nested_failures_point_at_the_enclosing_resource() {
    let (_, report) = run_check_on_fixture("nsg_mixed", &[]);
    let fail = report["results"]
        .as_array()
        .expect("results")
        .iter()
        .find(|r| r["status"] == "fail")
        .expect("a failure");
    assert_eq!(
        fail["resource"],
        "azurerm_network_security_group.example.security_rule[1]"
    );
    assert_eq!(fail["location"]["path"], "nsg.tf");
    assert_eq!(fail["location"]["start_line"], 1);
}

#[test]
fn reports_are_stable_across_job_counts() {
    let (_, sequential) = run_check_on_fixture("multi_provider", &["--jobs", "1"]);
    let (_, parallel) = run_check_on_fixture("multi_provider", &["--jobs", "4"]);
    assert_eq!(sequential["results"], parallel["results"]);
}

#[test]
fn audit_profile_turns_failures_into_pass_verdict() {
    let (exit_code, report) = run_check_on_fixture("rdp_open", &["--profile", "audit"]);
    assert_eq!(exit_code, 0);
    assert_eq!(report["verdict"], "pass");
    assert_eq!(failed_resources(&report).len(), 1);
}

#[test]
fn warn_profile_reports_warn_verdict() {
    let (exit_code, report) = run_check_on_fixture("rdp_open", &["--profile", "warn"]);
    assert_eq!(exit_code, 0);
    assert_eq!(report["verdict"], "warn");
}
