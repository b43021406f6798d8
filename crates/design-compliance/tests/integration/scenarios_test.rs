//! End-to-end validation scenarios

use crate::test_utils::{CLEAN_COMPONENT, FOCUS_COMPONENT, active_service, json_config, write_file};
use design_compliance::check::{CheckOptions, run_check};
use design_compliance::{AgentRunner, AutoFixer, Report, ReportGenerator, Severity};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_icon_in_title() {
    let temp = TempDir::new().unwrap();
    let file = write_file(
        temp.path(),
        "Dashboard.tsx",
        "import React from 'react';\n\nconst title = \"🎯 Dashboard\";\n",
    );
    let mut service = active_service();

    let result = service.validate_file(&file).unwrap();

    assert_eq!(result.violations.len(), 1);
    let v = &result.violations[0];
    assert_eq!(v.rule_id, "no-icons-in-titles");
    assert_eq!(v.severity, Severity::Error);
    assert_eq!(v.line, 3);
    assert_eq!(result.score, 90);
    assert!(!result.passed);
}

#[test]
fn test_all_caps_fixed_in_place() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "Label.tsx", "const label = \"THIS IS LOUD\";\n");
    let mut service = active_service();

    let results = service.validate_directory(temp.path()).unwrap();
    assert!(results[0].violations.iter().any(|v| v.rule_id == "no-all-caps"));

    let summary = AutoFixer::new().fix_results(&results);

    assert_eq!(summary.fixed, vec![file.clone()]);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "const label = \"This IS Loud\";\n"
    );

    // Fixed content no longer trips the rule
    let rechecked = service.validate_file(&file).unwrap();
    assert!(rechecked.passed);
}

#[test]
fn test_average_over_directory() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "A.tsx", CLEAN_COMPONENT);
    write_file(temp.path(), "B.tsx", CLEAN_COMPONENT);
    write_file(temp.path(), "C.tsx", FOCUS_COMPONENT);
    let mut service = active_service();

    let results = service.validate_directory(temp.path()).unwrap();
    let report = Report::from_results(&results);

    assert_eq!(report.average_score, 98);
    assert_eq!(report.total_violations, 1);
    assert_eq!(report.files_with_violations, 1);
}

#[test]
fn test_check_exit_codes() {
    let temp = TempDir::new().unwrap();
    let clean = temp.path().join("clean");
    let broken = temp.path().join("broken");
    write_file(&clean, "Card.tsx", CLEAN_COMPONENT);
    write_file(&broken, "Title.tsx", "const title = \"🎯 Dashboard\";\n");

    let report_path = temp.path().join("validation-report.json");
    let clean_outcome = run_check(&CheckOptions::new(&clean).with_report_path(&report_path)).unwrap();
    let broken_outcome =
        run_check(&CheckOptions::new(&broken).with_report_path(&report_path)).unwrap();

    assert_eq!(clean_outcome.exit_code(), 0);
    assert_eq!(broken_outcome.exit_code(), 1);
}

#[test]
fn test_json_report_totals_match_results() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "A.tsx", CLEAN_COMPONENT);
    write_file(temp.path(), "B.tsx", "const s = { margin: '8px', color: '#000000' };\n");
    write_file(temp.path(), "C.tsx", FOCUS_COMPONENT);
    let mut service = active_service();
    let results = service.validate_directory(temp.path()).unwrap();

    let json = ReportGenerator::render_json(&Report::from_results(&results)).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();

    let violations: usize = results.iter().map(|r| r.violations.len()).sum();
    assert_eq!(parsed.total_files, results.len());
    assert_eq!(parsed.total_violations, violations);
    assert_eq!(parsed.violations_by_type.values().sum::<usize>(), violations);
    assert_eq!(parsed.violations_by_severity.values().sum::<usize>(), violations);
}

#[tokio::test]
async fn test_watch_roots_share_one_score() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("components");
    let second = temp.path().join("modules");
    write_file(&first, "A.tsx", CLEAN_COMPONENT);
    write_file(&second, "B.tsx", CLEAN_COMPONENT);
    write_file(&second, "C.tsx", FOCUS_COMPONENT);
    let mut config = json_config(&temp, &first);
    config.watch_directories.push(second);
    let runner = AgentRunner::new(config).unwrap();

    runner.start().await.unwrap();
    let status = runner.status();
    runner.stop().await;

    assert_eq!(status.total_files_scanned, 3);
    assert_eq!(status.compliance_score, 98);
}
