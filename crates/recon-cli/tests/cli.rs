mod common;

use common::TestEnv;
use predicates::str::contains;
use serde_json::Value;
use std::fs;

#[test]
fn sources_lists_fingerprints() {
    TestEnv::new()
        .cmd()
        .arg("sources")
        .assert()
        .success()
        .stdout(contains("joinType (trustType)"))
        .stdout(contains("Encryption status"))
        .stdout(contains("Endpoint Health Status"));
}

#[test]
fn detect_reports_each_source() {
    let env = TestEnv::with_exports();
    env.cmd()
        .args(["detect", "--dir", env.inputs_arg()])
        .assert()
        .success()
        .stdout(contains("export2.csv (2 records)"))
        .stdout(contains("export3.csv (1 records)"))
        .stdout(contains("export1.csv (2 records)"))
        .stdout(contains("Missing sources: Recovery Tracking"));
}

#[test]
fn reconcile_writes_timestamped_csv() {
    let env = TestEnv::with_exports();
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "identity"])
        .assert()
        .success()
        .stdout(contains("Devices: 2"))
        .stdout(contains("Missing from at least one source: 2"))
        .stdout(contains("1 matched, 1 not found"))
        .stdout(contains("not provided"))
        .stdout(contains("Exported 2 rows"));

    let reports = env.reports();
    assert_eq!(reports.len(), 1);
    let name = reports[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("device_report_identity_"));
    assert!(name.ends_with(".csv"));

    let text = fs::read_to_string(&reports[0]).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("In Identity,In Ticketing,In Endpoint Protection,In Recovery Tracking,"));
    assert!(lines[1].starts_with("true,true,false,,LAPTOP-1,"));
    assert!(lines[2].starts_with("true,false,true,,LAPTOP-2,"));
    assert!(lines[1].contains("SN123"));
}

#[test]
fn reconcile_rerun_ignores_previous_report() {
    let env = TestEnv::with_exports();
    let out = env.root().join("first.csv");
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "endpoint"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    env.write_input("device_report_endpoint_protection_20260101_000000.csv", &fs::read_to_string(&out).unwrap());

    env.cmd()
        .args(["detect", "--dir", env.inputs_arg()])
        .assert()
        .success()
        .stdout(contains("Scanned 3 file(s)"))
        .stdout(contains("skipped report"));
}

#[test]
fn reconcile_json_output() {
    let env = TestEnv::with_exports();
    let out = env.root().join("report.json");
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "sophos", "--format", "json"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Endpoint Device Name"], "LAPTOP-2");
    assert_eq!(rows[0]["In Identity"], Value::Bool(true));
    assert_eq!(rows[1]["In Identity"], Value::Bool(false));
    assert_eq!(rows[1]["Identity Device Name"], "");
    assert_eq!(rows[0]["In Recovery Tracking"], Value::Null);
}

#[test]
fn reconcile_missing_base_source_fails_without_output() {
    let env = TestEnv::with_exports();
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "recovery_tracking"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("base source 'Recovery Tracking' was not found"));

    assert!(env.reports().is_empty());
}

#[test]
fn reconcile_requires_base() {
    let env = TestEnv::with_exports();
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg()])
        .assert()
        .failure()
        .stderr(contains("no base source selected"));
}

#[test]
fn reconcile_rejects_unknown_base() {
    let env = TestEnv::with_exports();
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "spreadsheet"])
        .assert()
        .failure()
        .stderr(contains("unknown source 'spreadsheet'"));
}

#[test]
fn reconcile_base_from_config_file() {
    let env = TestEnv::with_exports();
    env.write_root("device-recon.toml", "base = \"ticketing\"\n");

    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg()])
        .assert()
        .success()
        .stdout(contains("Base source: Ticketing"))
        .stdout(contains("Exported 1 rows"));

    let reports = env.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0]
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("device_report_ticketing_"));
}

#[test]
fn reconcile_header_only_base_is_not_detected() {
    let env = TestEnv::new();
    env.write_input("a.csv", "displayName,joinType (trustType)\nLAPTOP-1,AzureAd\n");
    env.write_input("b.csv", "Display Name,Used By\n");

    // An empty dataset is never detected, so ticketing is missing entirely
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "ticketing"])
        .assert()
        .failure()
        .stderr(contains("base source 'Ticketing' was not found"));

    assert!(env.reports().is_empty());
}

#[test]
fn reconcile_enforces_file_limit_from_config() {
    let env = TestEnv::with_exports();
    let config = env.write_root("limits.toml", "[limits]\nmax_files = 2\n");

    env.cmd()
        .arg("--config")
        .arg(&config)
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "identity"])
        .assert()
        .failure()
        .stderr(contains("found 3 CSV files"));
}

#[test]
fn reconcile_empty_folder_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "identity"])
        .assert()
        .failure()
        .stderr(contains("no CSV files found"));
}

#[test]
fn parse_shows_columns() {
    let env = TestEnv::new();
    let file = env.write_input("sophos.csv", common::ENDPOINT_CSV);

    env.cmd()
        .arg("parse")
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Columns: 7"))
        .stdout(contains("Records: 2"))
        .stdout(contains("LAPTOP-9"));
}

#[test]
fn reconcile_base_from_environment() {
    let env = TestEnv::with_exports();
    env.cmd()
        .env("DEVRECON_BASE", "ticketing")
        .args(["reconcile", "--dir", env.inputs_arg()])
        .assert()
        .success()
        .stdout(contains("Base source: Ticketing"));
}

#[test]
fn environment_overrides_config_file() {
    let env = TestEnv::with_exports();
    env.write_root("device-recon.toml", "base = \"identity\"\n\n[limits]\nmax_files = 10\n");

    env.cmd()
        .env("DEVRECON_LIMITS__MAX_FILES", "2")
        .args(["reconcile", "--dir", env.inputs_arg()])
        .assert()
        .failure()
        .stderr(contains("at most 2 allowed"));

    assert!(env.reports().is_empty());
}

#[test]
fn reconcile_output_to_missing_folder_names_path() {
    let env = TestEnv::with_exports();
    let out = env.root().join("no-such-dir").join("report.csv");
    env.cmd()
        .args(["reconcile", "--dir", env.inputs_arg(), "--base", "identity"])
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(contains("failed to write file"))
        .stderr(contains("report.csv"));
}
