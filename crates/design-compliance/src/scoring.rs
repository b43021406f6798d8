//! Compliance Scoring
//!
//! Each error costs 10 points and each warning 5, floored at 0. Info
//! violations are free.

use crate::constants::{ERROR_PENALTY, MAX_SCORE, WARNING_PENALTY};
use crate::violation::Violation;
use crate::Severity;
use serde::{Deserialize, Serialize};

/// Turns a violation list into a 0-100 score
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceScorer;

impl ComplianceScorer {
    /// Score one file's violations
    pub fn score(violations: &[Violation]) -> u8 {
        if violations.is_empty() {
            return MAX_SCORE;
        }

        let errors = count(violations, Severity::Error);
        let warnings = count(violations, Severity::Warning);
        let penalty = errors
            .saturating_mul(ERROR_PENALTY)
            .saturating_add(warnings.saturating_mul(WARNING_PENALTY));

        u32::from(MAX_SCORE).saturating_sub(penalty) as u8
    }
}

fn count(violations: &[Violation], severity: Severity) -> u32 {
    violations
        .iter()
        .filter(|v| v.severity == severity)
        .count()
        .try_into()
        .unwrap_or(u32::MAX)
}

/// Mean of every score seen, rounded only when read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingScore {
    sum: u64,
    count: u64,
}

impl RollingScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: u8) {
        self.sum += u64::from(score);
        self.count += 1;
    }

    /// Number of scores recorded
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Rounded mean, half up; 100 before anything was recorded
    pub fn average(&self) -> u8 {
        if self.count == 0 {
            return MAX_SCORE;
        }
        ((2 * self.sum + self.count) / (2 * self.count)) as u8
    }
}

/// Rounded mean of a slice of scores, 100 for an empty slice
pub fn average_score(scores: impl IntoIterator<Item = u8>) -> u8 {
    let mut rolling = RollingScore::new();
    for score in scores {
        rolling.record(score);
    }
    rolling.average()
}
