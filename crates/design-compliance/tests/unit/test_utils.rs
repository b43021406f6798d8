//! Shared test utilities for design-compliance tests

#![allow(dead_code)] // Test utilities may not all be used in every test file

use design_compliance::constants::{DEFAULT_EXCLUDE_PATTERNS, DEFAULT_EXTENSIONS};
use design_compliance::{
    AgentConfig, FileScanner, ReportFormat, RuleCategory, RuleSet, Severity, ValidationService,
    Violation,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Component that passes every built-in rule
pub const CLEAN_COMPONENT: &str = r#"export const Card = () => {
  return <div className="card">Hello world</div>;
};
"#;

/// Component with a single `focus-indicators` warning
pub const FOCUS_COMPONENT: &str = r#"const styles = {
  '&:focus': { outline: 'none' },
};
"#;

/// Write `content` to `dir/relative`, creating parent directories
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Scanner with the default extensions and excludes
pub fn default_scanner() -> FileScanner {
    FileScanner::new(
        DEFAULT_EXTENSIONS.iter().copied(),
        DEFAULT_EXCLUDE_PATTERNS.iter().copied(),
    )
    .unwrap()
}

/// Started service with the built-in rules
pub fn active_service() -> ValidationService {
    let mut service = ValidationService::new(RuleSet::builtin().unwrap(), default_scanner());
    service.start();
    service
}

/// Configuration watching `root`, reporting as JSON into `temp/reports`
pub fn json_config(temp: &TempDir, root: &Path) -> AgentConfig {
    AgentConfig {
        watch_directories: vec![root.to_path_buf()],
        report_format: ReportFormat::Json,
        reports_dir: temp.path().join("reports"),
        ..AgentConfig::default()
    }
}

/// Hand-built violation for scoring and reporting tests
pub fn violation(rule_id: &str, category: RuleCategory, severity: Severity) -> Violation {
    Violation {
        id: format!("{rule_id}-0"),
        rule_id: rule_id.to_string(),
        category,
        severity,
        file: PathBuf::from("src/components/Test.tsx"),
        line: 1,
        message: format!("{rule_id} message"),
        suggestion: format!("{rule_id} suggestion"),
    }
}
