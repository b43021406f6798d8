//! Configuration types

use crate::constants::*;
use crate::reporter::ReportFormat;
use crate::rules::RuleSet;
use crate::scan::FileScanner;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Roots scanned on every pass, in order
    pub watch_directories: Vec<PathBuf>,

    /// Base-name globs pruned from scanning
    pub exclude_patterns: Vec<String>,

    /// File-name suffixes that are validated
    pub extensions: Vec<String>,

    /// Interval between passes in milliseconds
    pub check_interval_ms: u64,

    /// Run the auto-fixer after each pass
    pub auto_fix: bool,

    /// Output of each pass report
    pub report_format: ReportFormat,

    /// Where JSON and HTML reports are written
    pub reports_dir: PathBuf,

    /// Maximum number of results kept in history (unbounded when unset)
    pub history_limit: Option<usize>,

    /// YAML rule table replacing the built-in catalogue
    pub rules_file: Option<PathBuf>,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            watch_directories: DEFAULT_WATCH_DIRECTORIES.iter().map(PathBuf::from).collect(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(ToString::to_string).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            auto_fix: false,
            report_format: ReportFormat::default(),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            history_limit: None,
            rules_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Scanner honoring the configured extensions and excludes
    pub fn scanner(&self) -> Result<FileScanner> {
        FileScanner::new(self.extensions.iter().cloned(), self.exclude_patterns.iter().cloned())
    }

    /// Configured rule table, or the built-in catalogue
    pub fn rule_set(&self) -> Result<RuleSet> {
        match &self.rules_file {
            Some(path) => RuleSet::from_yaml_file(path),
            None => RuleSet::builtin(),
        }
    }
}
