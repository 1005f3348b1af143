#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn riskmatrix_cmd() -> Command {
    let mut cmd = Command::cargo_bin("riskmatrix").expect("binary should be built");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("command should run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

#[test]
fn assess_json_has_report_sections() {
    let parsed = json_stdout(
        riskmatrix_cmd()
            .arg("assess")
            .arg("--risks")
            .arg(fixtures_dir().join("risks.json")),
    );

    assert_eq!(parsed["schema_version"], "0.1.0");
    assert_eq!(parsed["tool"]["name"], "riskmatrix-cli");
    assert_eq!(parsed["tenant"], "default");
    assert_eq!(parsed["matrix"]["dimension"], 4);
    assert_eq!(parsed["matrix"]["source"], "inherited-default");
    assert_eq!(parsed["matrix"]["fingerprint"].as_str().unwrap().len(), 64);
    assert_eq!(parsed["distribution"]["skipped"], 1);
}

#[test]
fn assess_sorts_risks_by_score() {
    let parsed = json_stdout(
        riskmatrix_cmd()
            .arg("assess")
            .arg("--risks")
            .arg(fixtures_dir().join("risks.json")),
    );

    let risks = parsed["risks"].as_array().unwrap();
    let ids: Vec<&str> = risks.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["R-1", "R-3", "R-2"]);

    let top = &risks[0]["classification"];
    assert_eq!(top["score"], 16);
    assert_eq!(top["level"], "VERY_HIGH");
    assert_eq!(top["label"], "Very High");
    assert_eq!(top["position"]["row"], 0);
    assert_eq!(top["position"]["col"], 3);
    assert_eq!(top["color"], "#dc2626");
}

#[test]
fn assess_applies_tenant_settings() {
    let parsed = json_stdout(
        riskmatrix_cmd()
            .arg("--settings")
            .arg(fixtures_dir().join("settings.json"))
            .arg("--tenant")
            .arg("acme")
            .arg("assess")
            .arg("--risks")
            .arg(fixtures_dir().join("risks.json")),
    );

    assert_eq!(parsed["matrix"]["dimension"], 5);
    assert_eq!(parsed["matrix"]["source"], "tenant-custom");
    assert_eq!(parsed["risks"][0]["classification"]["level"], "HIGH");
    assert_eq!(parsed["matrix"]["thresholds"][4]["label"], "Crítico");
    assert_eq!(parsed["matrix"]["thresholds"][4]["color"], "#7f1d1d");
}

#[test]
fn invalid_tenant_table_falls_back_to_builtin() {
    let parsed = json_stdout(
        riskmatrix_cmd()
            .arg("--settings")
            .arg(fixtures_dir().join("settings.json"))
            .arg("--tenant")
            .arg("broken")
            .arg("matrix"),
    );

    assert_eq!(parsed["source"], "inherited-default");
    assert_eq!(parsed["thresholds"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["thresholds"][0]["max_score"], 2);
}

#[test]
fn missing_settings_file_still_classifies() {
    riskmatrix_cmd()
        .arg("--settings")
        .arg("/nonexistent/settings.json")
        .arg("classify")
        .arg("--probability")
        .arg("4")
        .arg("--impact")
        .arg("4")
        .arg("--format")
        .arg("text")
        .assert()
        .success()
        .stdout(predicate::str::contains("score 16 [Very High] row 0 col 3"));
}

#[test]
fn fail_on_exits_1_when_breached() {
    riskmatrix_cmd()
        .arg("assess")
        .arg("--risks")
        .arg(fixtures_dir().join("risks.json"))
        .arg("--fail-on")
        .arg("critical")
        .assert()
        .code(1);
}

#[test]
fn fail_on_exits_0_below_threshold() {
    riskmatrix_cmd()
        .arg("assess")
        .arg("--risks")
        .arg(fixtures_dir().join("low_risks.json"))
        .arg("--fail-on")
        .arg("medium")
        .assert()
        .code(0);
}

#[test]
fn text_output_contains_sections() {
    riskmatrix_cmd()
        .arg("assess")
        .arg("--risks")
        .arg(fixtures_dir().join("risks.json"))
        .arg("--format")
        .arg("text")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tenant: default (4x4 matrix, InheritedDefault)"))
        .stdout(predicate::str::contains("Levels:"))
        .stdout(predicate::str::contains("Distribution:"))
        .stdout(predicate::str::contains("(1 incomplete records skipped)"))
        .stdout(predicate::str::contains("R-1 score 16 [Very High] row 0 col 3"));
}

#[test]
fn out_flag_writes_file() {
    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_path_buf();

    riskmatrix_cmd()
        .arg("assess")
        .arg("--risks")
        .arg(fixtures_dir().join("risks.json"))
        .arg("--out")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["risks"].as_array().unwrap().len(), 3);
}

#[test]
fn classify_clamps_out_of_range_input() {
    let clamped = json_stdout(
        riskmatrix_cmd()
            .arg("classify")
            .arg("--dimension")
            .arg("5")
            .arg("--probability")
            .arg("0")
            .arg("--impact")
            .arg("10"),
    );
    let corner = json_stdout(
        riskmatrix_cmd()
            .arg("classify")
            .arg("--dimension")
            .arg("5")
            .arg("--probability")
            .arg("1")
            .arg("--impact")
            .arg("5"),
    );

    assert_eq!(clamped, corner);
    assert_eq!(clamped["score"], 5);
}

#[test]
fn matrix_text_puts_highest_impact_on_top() {
    let output = riskmatrix_cmd()
        .arg("matrix")
        .arg("--dimension")
        .arg("3")
        .arg("--format")
        .arg("text")
        .output()
        .expect("command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("  3 Medium"));
    assert!(rows[0].ends_with("9 High"));
    assert!(rows[2].starts_with("  1 Low"));
}

#[test]
fn unsupported_dimension_is_rejected() {
    riskmatrix_cmd()
        .arg("matrix")
        .arg("--dimension")
        .arg("6")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dimension"));
}

#[test]
fn color_converts_between_forms() {
    let hex = json_stdout(riskmatrix_cmd().arg("color").arg("#dc2626"));
    assert_eq!(hex["hex"], "#dc2626");
    assert_eq!(hex["hsl"], "0 72% 51%");
    assert_eq!(hex["text"], "#ffffff");

    let hsl = json_stdout(riskmatrix_cmd().arg("color").arg("0 0% 100%"));
    assert_eq!(hsl["hex"], "#ffffff");
    assert_eq!(hsl["text"], "#000000");
}

#[test]
fn invalid_color_fails() {
    riskmatrix_cmd()
        .arg("color")
        .arg("red")
        .assert()
        .failure()
        .stderr(predicate::str::contains("red"));
}

#[test]
fn missing_risk_register_fails() {
    riskmatrix_cmd()
        .arg("assess")
        .arg("--risks")
        .arg("/nonexistent/risks.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read risk register"));
}
