// Regex tables and report rendering trip a handful of pedantic lints
#![allow(clippy::pedantic)]

//! Design-System Compliance Validation
//!
//! This crate checks front-end source files against the application's design
//! system and keeps a running compliance score:
//! - Typography (no icons in titles, no ALL CAPS, font family and size scale)
//! - Colors (text, button and background palette, contrast)
//! - Components (button sizing, padding, radius)
//! - Spacing (approved spacing steps)
//! - Accessibility (contrast, focus indicators)
//!
//! # Watch mode
//!
//! ```ignore
//! use design_compliance::{AgentConfig, AgentRunner};
//!
//! let runner = AgentRunner::new(AgentConfig::default())?;
//! runner.start().await?;      // first pass runs before this returns
//! // ... passes repeat every `check_interval_ms`
//! runner.stop().await;
//! ```
//!
//! # Single-shot mode
//!
//! ```ignore
//! let outcome = design_compliance::check::run_check(&CheckOptions::new("src/components"))?;
//! std::process::exit(outcome.exit_code());
//! ```

pub mod config;
pub mod constants;
pub mod logging;
pub mod scan;
pub mod violation;

pub mod engine;
pub mod rules;
pub mod scoring;

pub mod events;
pub mod service;

pub mod check;
pub mod fixer;
pub mod reporter;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

pub use check::{CheckOptions, CheckOutcome, CheckReport};
pub use config::{AgentConfig, ConfigLoader, LoggingConfig};
pub use engine::RuleEngine;
pub use events::{AgentEvent, EventBus};
pub use fixer::{AutoFixer, FixSummary};
pub use reporter::{Report, ReportFormat, ReportGenerator, ReportOutput, RuleCount};
pub use rules::{Rule, RuleSet};
pub use runner::{AgentRunner, PassSummary, RunnerPhase};
pub use scan::{FileScanner, ScanOutcome};
pub use scoring::{ComplianceScorer, RollingScore};
pub use service::{AgentStatus, ComplianceSnapshot, ValidationResult, ValidationService};
pub use violation::{RuleCategory, Violation};

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Designer agent is not active")]
    InactiveAgent,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidConfigValue { key: String, value: String },

    #[error("Invalid regex pattern in rule {rule}: {message}")]
    InvalidRegex { rule: String, message: String },

    #[error("Invalid rule {rule}: {message}")]
    InvalidRule { rule: String, message: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Wrap an I/O failure on a specific file
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Severity level for violations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Lowercase name used in reports and rule tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Info => write!(f, "INFO"),
        }
    }
}
