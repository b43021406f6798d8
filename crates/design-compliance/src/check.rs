//! Single-Shot Check
//!
//! Validates one directory once, prints a console report, writes a JSON
//! report next to the working directory and maps the outcome to a process
//! exit code. Used by CI and pre-commit hooks.

use crate::constants::{
    CHECK_EXTENSIONS, CHECK_REPORT_FILENAME, DEFAULT_CHECK_TARGET, DEFAULT_EXCLUDE_PATTERNS,
};
use crate::reporter::{Report, ReportGenerator};
use crate::rules::RuleSet;
use crate::scan::FileScanner;
use crate::service::{ValidationResult, ValidationService};
use crate::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Inputs of a single-shot check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Directory to validate
    pub target: PathBuf,
    /// Where the JSON report is written
    pub report_path: PathBuf,
    /// Rule table replacing the built-in catalogue
    pub rules_file: Option<PathBuf>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_TARGET)
    }
}

impl CheckOptions {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            report_path: PathBuf::from(CHECK_REPORT_FILENAME),
            rules_file: None,
        }
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn with_rules_file(mut self, path: Option<PathBuf>) -> Self {
        self.rules_file = path;
        self
    }
}

/// Persisted report of a check: the aggregate plus every file result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    #[serde(flatten)]
    pub summary: Report,
    pub results: Vec<ValidationResult>,
}

/// How a check ended
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The target directory does not exist; nothing was validated
    TargetMissing(PathBuf),
    /// The target was validated and the report written
    Completed {
        report: CheckReport,
        report_path: PathBuf,
    },
}

impl CheckOutcome {
    /// 0 when no error-severity violation was found, otherwise 1
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::TargetMissing(_) => 1,
            Self::Completed { report, .. } => u8::from(report.summary.has_errors()),
        }
    }
}

/// Run a single-shot check
pub fn run_check(options: &CheckOptions) -> Result<CheckOutcome> {
    info!(dir = %options.target.display(), "Design validation starting");

    if !options.target.is_dir() {
        error!(dir = %options.target.display(), "Directory not found");
        return Ok(CheckOutcome::TargetMissing(options.target.clone()));
    }

    let rules = match &options.rules_file {
        Some(path) => RuleSet::from_yaml_file(path)?,
        None => RuleSet::builtin()?,
    };
    let scanner = FileScanner::new(
        CHECK_EXTENSIONS.iter().map(ToString::to_string),
        DEFAULT_EXCLUDE_PATTERNS.iter().map(ToString::to_string),
    )?;

    let mut service = ValidationService::new(rules, scanner);
    service.start();
    let results = service.validate_directory(&options.target)?;
    service.stop();

    let report = CheckReport {
        summary: Report::from_results(&results),
        results,
    };
    println!("{}", render_check_console(&report));

    write_report(&report, &options.report_path)?;
    println!("Report saved to: {}", options.report_path.display());

    Ok(CheckOutcome::Completed {
        report,
        report_path: options.report_path.clone(),
    })
}

/// Console summary followed by every violating file and its lines
pub fn render_check_console(report: &CheckReport) -> String {
    let mut output = ReportGenerator::render_console(&report.summary);

    let with_issues: Vec<&ValidationResult> = report
        .results
        .iter()
        .filter(|r| !r.violations.is_empty())
        .collect();

    if with_issues.is_empty() {
        output.push_str("\nAll files are compliant with design system rules!\n");
        return output;
    }

    output.push_str("\n--- Files with Violations ---\n");
    for result in with_issues {
        let _ = writeln!(output, "\n  {}", result.file.display());
        let _ = writeln!(output, "     Score: {}/100", result.score);
        for v in &result.violations {
            let _ = writeln!(output, "     [{}] Line {}: {}", v.severity, v.line, v.message);
        }
    }
    output
}

fn write_report(report: &CheckReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AgentError::file_access(parent, e))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|e| AgentError::file_access(path, e))
}
