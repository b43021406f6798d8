//! Auto-Fixer
//!
//! Best-effort rewrites for exactly two rules:
//! - `no-icons-in-titles`: strip every icon glyph in the file
//! - `no-all-caps`: turn each 3+ letter uppercase word into `Capitalized`
//!
//! Both rewrites are file-wide, not limited to violating lines, so glyphs or
//! uppercase words in comments change as well. A file is only rewritten when
//! its content actually changed.

use crate::service::ValidationResult;
use crate::{AgentError, Result};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Rule whose violations strip icon glyphs
pub const NO_ICONS_RULE: &str = "no-icons-in-titles";

/// Rule whose violations re-case uppercase words
pub const NO_ALL_CAPS_RULE: &str = "no-all-caps";

/// Rules the fixer knows how to rewrite
pub const FIXABLE_RULES: [&str; 2] = [NO_ICONS_RULE, NO_ALL_CAPS_RULE];

static ICON_GLYPHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{2699}\x{FE0F}\x{1F527}\x{1F4C8}-\x{1F4CA}\x{1F3A8}-\x{1F3FF}]")
        .expect("Invalid regex")
});

static ALL_CAPS_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{3,}\b").expect("Invalid regex"));

/// Outcome of one fixer batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSummary {
    /// Files rewritten on disk
    pub fixed: Vec<PathBuf>,
    /// Qualifying files whose content was already clean
    pub unchanged: Vec<PathBuf>,
    /// Files that could not be read or written
    pub failed: Vec<PathBuf>,
}

/// Applies the narrow textual fixes
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoFixer;

impl AutoFixer {
    pub fn new() -> Self {
        Self
    }

    /// Fixable rule ids with at least one error violation in `result`
    pub fn fixable_rules(result: &ValidationResult) -> Vec<&'static str> {
        FIXABLE_RULES
            .into_iter()
            .filter(|rule| result.has_error_for(rule))
            .collect()
    }

    /// Rewrite `content` for the given rule ids; `None` if nothing changed
    pub fn fix_content(content: &str, rule_ids: &[&str]) -> Option<String> {
        let mut fixed = content.to_string();

        if rule_ids.contains(&NO_ICONS_RULE) {
            fixed = ICON_GLYPHS.replace_all(&fixed, "").into_owned();
        }

        if rule_ids.contains(&NO_ALL_CAPS_RULE) {
            fixed = ALL_CAPS_WORD
                .replace_all(&fixed, |caps: &Captures<'_>| {
                    let word = &caps[0];
                    let (first, rest) = word.split_at(1);
                    format!("{first}{}", rest.to_lowercase())
                })
                .into_owned();
        }

        (fixed != content).then_some(fixed)
    }

    /// Fix every qualifying file; failures are logged and do not stop the batch
    pub fn fix_results(&self, results: &[ValidationResult]) -> FixSummary {
        let mut summary = FixSummary::default();

        for result in results {
            let rules = Self::fixable_rules(result);
            if rules.is_empty() {
                continue;
            }

            match self.fix_file(&result.file, &rules) {
                Ok(true) => {
                    info!(file = %result.file.display(), "Auto-fixed violations");
                    summary.fixed.push(result.file.clone());
                }
                Ok(false) => {
                    debug!(file = %result.file.display(), "Nothing to rewrite");
                    summary.unchanged.push(result.file.clone());
                }
                Err(e) => {
                    warn!(file = %result.file.display(), error = %e, "Auto-fix failed");
                    summary.failed.push(result.file.clone());
                }
            }
        }

        summary
    }

    /// Rewrite one file in place; `Ok(false)` when it was already clean
    pub fn fix_file(&self, path: &Path, rule_ids: &[&str]) -> Result<bool> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AgentError::file_access(path, e))?;
        match Self::fix_content(&content, rule_ids) {
            Some(fixed) => {
                std::fs::write(path, fixed).map_err(|e| AgentError::file_access(path, e))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
