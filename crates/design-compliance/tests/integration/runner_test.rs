//! Scheduler lifecycle tests

use crate::test_utils::{CLEAN_COMPONENT, FOCUS_COMPONENT, json_config, write_file};
use design_compliance::{AgentError, AgentRunner, ReportOutput, RunnerPhase};
use std::time::Duration;
use tempfile::TempDir;

fn runner_for(temp: &TempDir, interval_ms: u64) -> AgentRunner {
    let root = temp.path().join("src");
    write_file(&root, "Card.tsx", CLEAN_COMPONENT);
    write_file(&root, "Focus.tsx", FOCUS_COMPONENT);
    let config = json_config(temp, &root);
    AgentRunner::new(design_compliance::AgentConfig {
        check_interval_ms: interval_ms,
        ..config
    })
    .unwrap()
}

#[tokio::test]
async fn test_start_twice_runs_one_initial_pass() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);

    runner.start().await.unwrap();
    runner.start().await.unwrap();

    assert_eq!(runner.phase(), RunnerPhase::Running);
    assert_eq!(runner.passes_completed(), 1);
    assert_eq!(runner.status().total_files_scanned, 2);

    runner.stop().await;
    assert_eq!(runner.phase(), RunnerPhase::Stopped);
    assert!(!runner.status().is_active);
}

#[tokio::test]
async fn test_stop_before_start_is_noop() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);

    runner.stop().await;

    assert_eq!(runner.phase(), RunnerPhase::Stopped);
    assert_eq!(runner.passes_completed(), 0);
}

#[tokio::test]
async fn test_run_pass_requires_start() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);

    assert!(matches!(runner.run_pass().await, Err(AgentError::InactiveAgent)));
}

#[tokio::test]
async fn test_on_demand_pass_writes_report() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);
    runner.start().await.unwrap();

    let summary = runner.run_pass().await.unwrap().unwrap();
    runner.stop().await;

    assert_eq!(summary.files_validated, 2);
    assert_eq!(summary.violations, 1);
    assert_eq!(summary.average_score, 98);
    assert!(summary.fixes.is_none());
    match summary.report {
        ReportOutput::Written(path) => assert!(path.starts_with(temp.path().join("reports"))),
        other => panic!("Expected a JSON report, got {other:?}"),
    }
    assert_eq!(runner.passes_completed(), 2);
}

#[tokio::test]
async fn test_passes_repeat_until_stopped() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 40);

    runner.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    runner.stop().await;

    let after_stop = runner.passes_completed();
    assert!(after_stop >= 2, "only {after_stop} passes ran");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(runner.passes_completed(), after_stop);
}

#[tokio::test]
async fn test_restart_after_stop() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);

    runner.start().await.unwrap();
    runner.stop().await;
    runner.start().await.unwrap();

    assert_eq!(runner.phase(), RunnerPhase::Running);
    assert_eq!(runner.passes_completed(), 2);
    runner.stop().await;
}

#[tokio::test]
async fn test_initial_pass_failure_propagates() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    write_file(&root, "Card.tsx", CLEAN_COMPONENT);
    // A regular file where the reports directory should be
    let blocker = write_file(temp.path(), "reports", "not a directory");
    let config = design_compliance::AgentConfig {
        reports_dir: blocker.join("nested"),
        ..json_config(&temp, &root)
    };
    let runner = AgentRunner::new(config).unwrap();

    let result = runner.start().await;

    assert!(matches!(result, Err(AgentError::FileAccess { .. })));
    assert_eq!(runner.phase(), RunnerPhase::Stopped);
    assert!(!runner.status().is_active);
    assert_eq!(runner.passes_completed(), 0);
}

#[tokio::test]
async fn test_missing_watch_root_is_not_fatal() {
    let temp = TempDir::new().unwrap();
    let config = json_config(&temp, &temp.path().join("does-not-exist"));
    let runner = AgentRunner::new(config).unwrap();

    runner.start().await.unwrap();
    let status = runner.status();
    runner.stop().await;

    assert_eq!(status.total_files_scanned, 0);
    assert_eq!(status.compliance_score, 100);
    assert_eq!(runner.passes_completed(), 1);
}

#[tokio::test]
async fn test_auto_fix_after_pass() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    let loud = write_file(&root, "Loud.tsx", "const label = \"THIS IS LOUD\";\n");
    let config = design_compliance::AgentConfig {
        auto_fix: true,
        ..json_config(&temp, &root)
    };
    let runner = AgentRunner::new(config).unwrap();

    runner.start().await.unwrap();
    runner.stop().await;

    assert_eq!(
        std::fs::read_to_string(&loud).unwrap(),
        "const label = \"This IS Loud\";\n"
    );
}

#[tokio::test]
async fn test_validate_file_follows_lifecycle() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);
    let file = temp.path().join("src").join("Focus.tsx");

    assert!(matches!(
        runner.validate_file(&file).await,
        Err(AgentError::InactiveAgent)
    ));

    runner.start().await.unwrap();
    let result = runner.validate_file(&file).await.unwrap();
    assert_eq!(result.score, 95);
    assert_eq!(runner.history().unwrap().len(), 3);
    assert_eq!(runner.compliance_snapshot().unwrap().recommendations.len(), 1);
    runner.stop().await;

    assert!(matches!(
        runner.validate_file(&file).await,
        Err(AgentError::InactiveAgent)
    ));
}

#[tokio::test]
async fn test_auto_fix_runs_when_report_fails() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    let loud = write_file(&root, "Loud.tsx", "const label = \"THIS IS LOUD\";\n");
    let blocker = write_file(temp.path(), "reports", "not a directory");
    let config = design_compliance::AgentConfig {
        auto_fix: true,
        reports_dir: blocker.join("nested"),
        ..json_config(&temp, &root)
    };
    let runner = AgentRunner::new(config).unwrap();

    let result = runner.start().await;

    assert!(matches!(result, Err(AgentError::FileAccess { .. })));
    assert_eq!(
        std::fs::read_to_string(&loud).unwrap(),
        "const label = \"This IS Loud\";\n"
    );
    assert_eq!(runner.passes_completed(), 0);
}

#[tokio::test]
async fn test_status_tracks_passes_and_lifecycle() {
    let temp = TempDir::new().unwrap();
    let runner = runner_for(&temp, 60_000);
    assert!(!runner.status().is_active);

    runner.start().await.unwrap();
    assert!(runner.status().is_active);
    runner.run_pass().await.unwrap();
    let status = runner.status();
    runner.stop().await;

    assert_eq!(status.total_files_scanned, 4);
    assert_eq!(status.violations_found, 2);
    assert_eq!(status.compliance_score, 98);
    assert!(!runner.status().is_active);
}
