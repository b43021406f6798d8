//! Violations
//!
//! A violation is one rule matching one line of one file. Violations are
//! created by the rule engine and owned by the validation result that
//! contains them.

use crate::Severity;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::PathBuf;

/// Category of a rule, used for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Fonts, sizes, capitalization, icons in headings
    Typography,
    /// Palette usage
    Color,
    /// Spacing scale
    Spacing,
    /// Component styling (buttons)
    Component,
    /// Contrast and focus handling
    Accessibility,
}

impl RuleCategory {
    /// All categories in report order
    pub const ALL: [RuleCategory; 5] = [
        Self::Typography,
        Self::Color,
        Self::Spacing,
        Self::Component,
        Self::Accessibility,
    ];

    /// Lowercase name used as report key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typography => "typography",
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::Component => "component",
            Self::Accessibility => "accessibility",
        }
    }
}

impl Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Typography => write!(f, "Typography"),
            Self::Color => write!(f, "Color"),
            Self::Spacing => write!(f, "Spacing"),
            Self::Component => write!(f, "Component"),
            Self::Accessibility => write!(f, "Accessibility"),
        }
    }
}

/// One rule match on one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// `<rule id>-<0-based line index>`; unique within a file only
    pub id: String,
    pub rule_id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    pub message: String,
    pub suggestion: String,
}

impl Violation {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} [{}] {} ({})",
            self.file.display(),
            self.line,
            self.rule_id,
            self.message,
            self.suggestion
        )
    }
}
