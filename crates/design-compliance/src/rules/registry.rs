//! Declarative Rule Registry
//!
//! Rules are data: a category, a severity, a line predicate and the text shown
//! to the developer. All rules are applied by the same generic engine.

use crate::violation::RuleCategory;
use crate::{AgentError, Result, Severity};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

use super::yaml_loader::{self, RuleDefinition};

/// Capture group whose position anchors the `unless` check
pub const VALUE_GROUP: &str = "value";

/// Embedded built-in rule table
const BUILTIN_RULES_YAML: &str = include_str!("../../rules/design-rules.yml");

/// A single compliance check applied to every line of a file
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule identifier (e.g., "no-all-caps")
    pub id: String,
    /// Category for grouping in reports
    pub category: RuleCategory,
    /// Severity of every violation this rule emits
    pub severity: Severity,
    /// Human-readable description of the violation
    pub message: String,
    /// How to fix it
    pub suggestion: String,
    pattern: Regex,
    unless: Option<Regex>,
}

impl Rule {
    /// Build a rule, compiling its patterns
    ///
    /// `unless` requires a `value` capture group in `pattern`.
    pub fn new(
        id: impl Into<String>,
        category: RuleCategory,
        severity: Severity,
        pattern: &str,
        unless: Option<&str>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let pattern = compile(&id, pattern)?;
        let unless = unless.map(|u| compile(&id, u)).transpose()?;

        if unless.is_some() && !pattern.capture_names().flatten().any(|n| n == VALUE_GROUP) {
            return Err(AgentError::InvalidRule {
                rule: id,
                message: format!("`unless` requires a `(?P<{VALUE_GROUP}>...)` group in the pattern"),
            });
        }

        Ok(Self {
            id,
            category,
            severity,
            message: message.into(),
            suggestion: suggestion.into(),
            pattern,
            unless,
        })
    }

    /// Whether this rule fires on a single line
    pub fn matches(&self, line: &str) -> bool {
        let Some(unless) = &self.unless else {
            return self.pattern.is_match(line);
        };

        self.pattern.captures_iter(line).any(|caps| {
            let start = match caps.name(VALUE_GROUP) {
                Some(value) => value.start(),
                None => caps.get(0).map_or(line.len(), |m| m.end()),
            };
            !unless.is_match(&line[start..])
        })
    }

    /// Source of the line pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Source of the exemption pattern, if any
    pub fn unless(&self) -> Option<&str> {
        self.unless.as_ref().map(Regex::as_str)
    }
}

fn compile(rule: &str, source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| AgentError::InvalidRegex {
        rule: rule.to_string(),
        message: e.to_string(),
    })
}

/// Ordered, immutable collection of rules
///
/// Order is significant: violations within a file are grouped by the order in
/// which rules appear here.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build from already-compiled rules, rejecting duplicate ids
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(AgentError::InvalidRule {
                    rule: rule.id.clone(),
                    message: "duplicate rule id".to_string(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// The built-in design-system catalogue
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_RULES_YAML)
    }

    /// Load a rule table from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let definitions = yaml_loader::parse_rule_table(yaml)?;
        Self::from_definitions(definitions)
    }

    /// Load a rule table from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml =
            std::fs::read_to_string(path).map_err(|e| AgentError::file_access(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    fn from_definitions(definitions: Vec<RuleDefinition>) -> Result<Self> {
        let rules = definitions
            .into_iter()
            .map(RuleDefinition::compile)
            .collect::<Result<Vec<_>>>()?;
        Self::new(rules)
    }

    /// All rules, in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get a rule by ID
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Get rules by category
    pub fn by_category(&self, category: RuleCategory) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
