//! YAML Rule Loader
//!
//! Parses rule tables of the form:
//!
//! ```yaml
//! version: 1
//! rules:
//!   - id: no-all-caps
//!     category: typography
//!     severity: error
//!     pattern: '[A-Z]{3,}'
//!     message: Never use ALL CAPS text
//!     suggestion: Replace ALL CAPS with proper capitalization.
//! ```

use serde::{Deserialize, Serialize};

use super::registry::Rule;
use crate::violation::RuleCategory;
use crate::{AgentError, Result, Severity};

/// Newest table format this loader understands
pub const SUPPORTED_TABLE_VERSION: u32 = 1;

/// Top-level document of a rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default = "default_version")]
    pub version: u32,
    pub rules: Vec<RuleDefinition>,
}

fn default_version() -> u32 {
    SUPPORTED_TABLE_VERSION
}

/// Uncompiled rule as written in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub pattern: String,
    #[serde(default)]
    pub unless: Option<String>,
    pub message: String,
    pub suggestion: String,
}

impl RuleDefinition {
    /// Compile patterns into an executable rule
    pub fn compile(self) -> Result<Rule> {
        Rule::new(
            self.id,
            self.category,
            self.severity,
            &self.pattern,
            self.unless.as_deref(),
            self.message,
            self.suggestion,
        )
    }
}

/// Parse a rule table, checking the format version
pub fn parse_rule_table(yaml: &str) -> Result<Vec<RuleDefinition>> {
    let table: RuleTable = serde_yaml::from_str(yaml)?;
    if table.version > SUPPORTED_TABLE_VERSION {
        return Err(AgentError::Configuration(format!(
            "Unsupported rule table version {} (max {SUPPORTED_TABLE_VERSION})",
            table.version
        )));
    }
    Ok(table.rules)
}
