//! Rule Engine
//!
//! Applies a rule set to the content of one file. Matching is strictly
//! per line: constructs spanning several lines are not seen, and a rule may
//! fire on a coincidental single-line match.

use crate::rules::Rule;
use crate::violation::Violation;
use std::path::Path;

/// Stateless engine applying rules line by line
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply every rule to every line of `content`
    ///
    /// Violations are ordered by rule, then by line. Several rules may fire
    /// on the same line and a rule fires once per matching line.
    pub fn validate(&self, content: &str, file: &Path, rules: &[Rule]) -> Vec<Violation> {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let mut violations = Vec::new();
        for rule in rules {
            for (index, line) in lines.iter().enumerate() {
                if rule.matches(line) {
                    violations.push(Violation {
                        id: format!("{}-{}", rule.id, index),
                        rule_id: rule.id.clone(),
                        category: rule.category,
                        severity: rule.severity,
                        file: file.to_path_buf(),
                        line: index + 1,
                        message: rule.message.clone(),
                        suggestion: rule.suggestion.clone(),
                    });
                }
            }
        }
        violations
    }
}
