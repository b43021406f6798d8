//! Compliance Report Generation
//!
//! Aggregates a pass's validation results and renders them as:
//! - Console text printed to stdout
//! - Pretty JSON written under the reports directory
//! - A standalone HTML page written under the reports directory

use crate::constants::{REPORT_FILE_PREFIX, TOP_VIOLATIONS_LIMIT};
use crate::scoring::average_score;
use crate::service::ValidationResult;
use crate::violation::{RuleCategory, Violation};
use crate::{AgentError, Result, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Output format of a pass report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Html,
    #[default]
    Console,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Console => "console",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "console" => Ok(Self::Console),
            _ => Err(AgentError::InvalidConfigValue {
                key: "format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occurrences of one rule across a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCount {
    pub rule: String,
    pub count: usize,
}

/// Aggregate over the results of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub total_files: usize,
    pub total_violations: usize,
    /// Rounded mean of the file scores, 100 for an empty pass
    pub average_score: u8,
    pub files_with_violations: usize,
    /// Violation count per category
    pub violations_by_type: BTreeMap<String, usize>,
    /// Violation count per severity
    pub violations_by_severity: BTreeMap<String, usize>,
    /// Most frequent rules, count descending then rule id ascending
    pub top_violations: Vec<RuleCount>,
    pub recommendations: Vec<String>,
}

impl Report {
    /// Aggregate `results`, stamped with the current time
    pub fn from_results(results: &[ValidationResult]) -> Self {
        Self::from_results_at(results, Utc::now())
    }

    /// Aggregate `results` with an explicit timestamp
    pub fn from_results_at(results: &[ValidationResult], timestamp: DateTime<Utc>) -> Self {
        let violations: Vec<&Violation> = results.iter().flat_map(|r| r.violations.iter()).collect();

        let mut violations_by_type = BTreeMap::new();
        let mut violations_by_severity = BTreeMap::new();
        let mut rule_counts: HashMap<&str, usize> = HashMap::new();
        for v in &violations {
            *violations_by_type
                .entry(v.category.as_str().to_string())
                .or_insert(0) += 1;
            *violations_by_severity
                .entry(v.severity.as_str().to_string())
                .or_insert(0) += 1;
            *rule_counts.entry(v.rule_id.as_str()).or_insert(0) += 1;
        }

        let mut top_violations: Vec<RuleCount> = rule_counts
            .into_iter()
            .map(|(rule, count)| RuleCount {
                rule: rule.to_string(),
                count,
            })
            .collect();
        top_violations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.rule.cmp(&b.rule)));
        top_violations.truncate(TOP_VIOLATIONS_LIMIT);

        Self {
            timestamp,
            total_files: results.len(),
            total_violations: violations.len(),
            average_score: average_score(results.iter().map(|r| r.score)),
            files_with_violations: results.iter().filter(|r| !r.violations.is_empty()).count(),
            violations_by_type,
            violations_by_severity,
            top_violations,
            recommendations: recommendations(&violations),
        }
    }

    /// Whether any error-severity violation was found
    pub fn has_errors(&self) -> bool {
        self.violations_by_severity
            .get(Severity::Error.as_str())
            .is_some_and(|n| *n > 0)
    }
}

/// Advice for a category with at least one violation
pub fn category_recommendation(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Typography => {
            "Review typography: Remove icons from titles, avoid ALL CAPS, use consistent font sizes"
        }
        RuleCategory::Color => {
            "Review colors: Use design system colors consistently (#212529, #6C757D, #93C5FD)"
        }
        RuleCategory::Spacing => {
            "Review spacing: Use the approved spacing steps (5px, 10px, 15px, 20px, 30px)"
        }
        RuleCategory::Component => {
            "Review components: Ensure consistent button styling and spacing"
        }
        RuleCategory::Accessibility => {
            "Review accessibility: Ensure proper color contrast and focus indicators"
        }
    }
}

fn recommendations(violations: &[&Violation]) -> Vec<String> {
    let mut out = Vec::new();

    let errors = violations.iter().filter(|v| v.is_error()).count();
    let warnings = violations
        .iter()
        .filter(|v| v.severity == Severity::Warning)
        .count();

    if errors > 0 {
        out.push(format!(
            "{errors} critical design violations found. Please fix these immediately."
        ));
    }
    if warnings > 0 {
        out.push(format!(
            "{warnings} design warnings found. Consider addressing these for better consistency."
        ));
    }

    let categories: BTreeSet<RuleCategory> = violations.iter().map(|v| v.category).collect();
    out.extend(
        RuleCategory::ALL
            .into_iter()
            .filter(|c| categories.contains(c))
            .map(|c| category_recommendation(c).to_string()),
    );
    out
}

/// Where an emitted report ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutput {
    /// Console text, already printed to stdout
    Printed(String),
    /// JSON or HTML file on disk
    Written(PathBuf),
}

/// Renders and persists pass reports
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    reports_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Aggregate `results` and emit them in `format`
    pub fn emit(&self, results: &[ValidationResult], format: ReportFormat) -> Result<ReportOutput> {
        let report = Report::from_results(results);
        match format {
            ReportFormat::Console => {
                let text = Self::render_console(&report);
                println!("{text}");
                Ok(ReportOutput::Printed(text))
            }
            ReportFormat::Json => {
                let path = self.write(&report, "json", &Self::render_json(&report)?)?;
                info!(path = %path.display(), "JSON report saved");
                Ok(ReportOutput::Written(path))
            }
            ReportFormat::Html => {
                let path = self.write(&report, "html", &Self::render_html(&report))?;
                info!(path = %path.display(), "HTML report saved");
                Ok(ReportOutput::Written(path))
            }
        }
    }

    /// `<reports_dir>/design-compliance-<YYYY-MM-DD>.<extension>`
    pub fn report_path(&self, report: &Report, extension: &str) -> PathBuf {
        self.reports_dir.join(format!(
            "{REPORT_FILE_PREFIX}-{}.{extension}",
            report.timestamp.format("%Y-%m-%d")
        ))
    }

    fn write(&self, report: &Report, extension: &str, body: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.reports_dir)
            .map_err(|e| AgentError::file_access(&self.reports_dir, e))?;
        let path = self.report_path(report, extension);
        std::fs::write(&path, body).map_err(|e| AgentError::file_access(&path, e))?;
        Ok(path)
    }

    /// Pretty JSON with camelCase keys
    pub fn render_json(report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Human-readable summary
    pub fn render_console(report: &Report) -> String {
        let mut output = String::new();

        output.push_str("\n=== Design Compliance Report ===\n");
        let _ = writeln!(output, "Overall Score:      {}/100", report.average_score);
        let _ = writeln!(output, "Files Scanned:      {}", report.total_files);
        let _ = writeln!(output, "Total Violations:   {}", report.total_violations);
        let _ = writeln!(output, "Files with Issues:  {}", report.files_with_violations);

        if !report.violations_by_type.is_empty() {
            output.push_str("\n--- Violations by Type ---\n");
            for (category, count) in &report.violations_by_type {
                let _ = writeln!(output, "  {category}: {count}");
            }
        }

        if !report.top_violations.is_empty() {
            output.push_str("\n--- Top Violations ---\n");
            for entry in &report.top_violations {
                let _ = writeln!(output, "  {}: {}", entry.rule, entry.count);
            }
        }

        if !report.recommendations.is_empty() {
            output.push_str("\n--- Recommendations ---\n");
            for rec in &report.recommendations {
                let _ = writeln!(output, "  {rec}");
            }
        }

        output
    }

    /// Standalone HTML page
    pub fn render_html(report: &Report) -> String {
        let score_color = if report.average_score >= 80 {
            "#14B8A6"
        } else {
            "#F8D7DA"
        };

        let mut top = String::new();
        for entry in &report.top_violations {
            let _ = writeln!(
                top,
                r#"      <div class="violation-item"><strong>{}</strong> - {} occurrences</div>"#,
                escape_html(&entry.rule),
                entry.count
            );
        }

        let mut recs = String::new();
        for rec in &report.recommendations {
            let _ = writeln!(recs, r#"      <div class="recommendation">{}</div>"#, escape_html(rec));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Design Compliance Report</title>
  <style>
    body {{ font-family: 'Plus Jakarta Sans', sans-serif; margin: 20px; background: #F8F9FA; }}
    .container {{ max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 15px; }}
    .header {{ text-align: center; margin-bottom: 30px; }}
    .score {{ font-size: 48px; font-weight: bold; color: {score_color}; }}
    .stats {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 20px 0; }}
    .stat-card {{ background: #F8F9FA; padding: 15px; border-radius: 10px; text-align: center; }}
    .violation-item {{ background: #F8F9FA; padding: 10px; margin: 5px 0; border-radius: 5px; }}
    .recommendations {{ background: #D1ECF1; padding: 15px; border-radius: 10px; margin: 20px 0; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Design Compliance Report</h1>
      <div class="score">{score}/100</div>
      <p>Generated on {timestamp}</p>
    </div>
    <div class="stats">
      <div class="stat-card"><h3>{files}</h3><p>Files Scanned</p></div>
      <div class="stat-card"><h3>{violations}</h3><p>Total Violations</p></div>
      <div class="stat-card"><h3>{with_issues}</h3><p>Files with Issues</p></div>
    </div>
    <div class="violations">
      <h2>Top Violations</h2>
{top}    </div>
    <div class="recommendations">
      <h2>Recommendations</h2>
{recs}    </div>
  </div>
</body>
</html>
"#,
            score = report.average_score,
            timestamp = report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            files = report.total_files,
            violations = report.total_violations,
            with_issues = report.files_with_violations,
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
