//! Validation Service
//!
//! Orchestrates scanning, rule application and scoring for single files and
//! directory trees, and owns the agent's running status and history.

use crate::config::AgentConfig;
use crate::constants::{SNAPSHOT_ERROR_LIMIT, SNAPSHOT_RECENT_WINDOW};
use crate::engine::RuleEngine;
use crate::events::{AgentEvent, EventBus};
use crate::reporter::category_recommendation;
use crate::rules::RuleSet;
use crate::scan::FileScanner;
use crate::scoring::{ComplianceScorer, RollingScore};
use crate::violation::{RuleCategory, Violation};
use crate::{AgentError, Result, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// Violations, score and verdict for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub file: PathBuf,
    /// Rule order, then line order
    pub violations: Vec<Violation>,
    pub score: u8,
    /// True when no violation has error severity
    pub passed: bool,
}

impl ValidationResult {
    /// Score and judge a file's violations
    pub fn new(file: impl Into<PathBuf>, violations: Vec<Violation>) -> Self {
        let score = ComplianceScorer::score(&violations);
        let passed = !violations.iter().any(Violation::is_error);
        Self {
            file: file.into(),
            violations,
            score,
            passed,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Whether `rule_id` produced at least one error-severity violation here
    pub fn has_error_for(&self, rule_id: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.is_error() && v.rule_id == rule_id)
    }
}

/// Running status of the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub is_active: bool,
    pub last_check: DateTime<Utc>,
    pub total_files_scanned: u64,
    pub violations_found: u64,
    /// Rounded mean of every file score seen
    pub compliance_score: u8,
}

impl Default for AgentStatus {
    fn default() -> Self {
        Self {
            is_active: false,
            last_check: Utc::now(),
            total_files_scanned: 0,
            violations_found: 0,
            compliance_score: RollingScore::new().average(),
        }
    }
}

/// Point-in-time view of the agent for dashboards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSnapshot {
    pub status: AgentStatus,
    /// First error-severity violations in history
    pub recent_errors: Vec<Violation>,
    pub compliance_score: u8,
    pub recommendations: Vec<String>,
}

/// Shared on/off switch of a [`ValidationService`]
///
/// Lets a scheduler stop a running pass between files without waiting for
/// the service lock.
#[derive(Debug, Clone)]
pub struct ActivationHandle(Arc<AtomicBool>);

impl ActivationHandle {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn deactivate(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Validates files and tracks aggregate status
pub struct ValidationService {
    rules: RuleSet,
    engine: RuleEngine,
    scanner: FileScanner,
    active: Arc<AtomicBool>,
    history: Vec<ValidationResult>,
    history_limit: Option<usize>,
    rolling: RollingScore,
    /// Latest status, readable without the service lock
    status: watch::Sender<AgentStatus>,
    events: EventBus,
}

impl ValidationService {
    /// Create an inactive service
    pub fn new(rules: RuleSet, scanner: FileScanner) -> Self {
        Self {
            rules,
            engine: RuleEngine::new(),
            scanner,
            active: Arc::new(AtomicBool::new(false)),
            history: Vec::new(),
            history_limit: None,
            rolling: RollingScore::new(),
            status: watch::Sender::new(AgentStatus::default()),
            events: EventBus::new(),
        }
    }

    /// Create a service from configuration (rules, scanner, history cap)
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Ok(Self::new(config.rule_set()?, config.scanner()?).with_history_limit(config.history_limit))
    }

    /// Keep at most `limit` results in history
    ///
    /// The rolling score still counts every result ever validated.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub fn start(&mut self) {
        self.active.store(true, Ordering::SeqCst);
        self.status.send_modify(|status| status.is_active = true);
        self.events.publish(AgentEvent::Started);
        info!("Designer agent started - monitoring design compliance");
    }

    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.status.send_modify(|status| status.is_active = false);
        self.events.publish(AgentEvent::Stopped);
        info!("Designer agent stopped");
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn activation_handle(&self) -> ActivationHandle {
        ActivationHandle(Arc::clone(&self.active))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.events.subscribe()
    }

    /// Status updates, published after every validated file
    pub fn watch_status(&self) -> watch::Receiver<AgentStatus> {
        self.status.subscribe()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn scanner(&self) -> &FileScanner {
        &self.scanner
    }

    /// Validate one file and record the result
    pub fn validate_file(&mut self, path: &Path) -> Result<ValidationResult> {
        if !self.is_active() {
            return Err(AgentError::InactiveAgent);
        }

        let bytes = std::fs::read(path).map_err(|e| AgentError::file_access(path, e))?;
        // Invalid UTF-8 sequences become U+FFFD; the rest of the file is still checked
        let content = String::from_utf8_lossy(&bytes);
        let violations = self.engine.validate(&content, path, self.rules.rules());
        let result = ValidationResult::new(path, violations);

        self.record(result.clone());
        debug!(
            file = %path.display(),
            violations = result.violations.len(),
            score = result.score,
            "File validated"
        );
        self.events
            .publish(AgentEvent::ValidationComplete(result.clone()));
        Ok(result)
    }

    /// Validate every candidate file under `root`
    ///
    /// Unreadable files are logged and left out. A missing root yields no
    /// results. If the service is stopped mid-walk, the results gathered so
    /// far are returned and no further file is read.
    pub fn validate_directory(&mut self, root: &Path) -> Result<Vec<ValidationResult>> {
        if !self.is_active() {
            return Err(AgentError::InactiveAgent);
        }

        if !root.exists() {
            let err = AgentError::Configuration(format!(
                "Watch root not found: {}",
                root.display()
            ));
            warn!(error = %err, "Skipping watch root");
            return Ok(Vec::new());
        }

        let outcome = self.scanner.scan_detailed(root);
        for skipped in &outcome.errors {
            warn!(path = %skipped.path.display(), reason = %skipped.message, "Directory skipped");
        }

        let mut results = Vec::with_capacity(outcome.files.len());
        for file in &outcome.files {
            if !self.is_active() {
                info!(root = %root.display(), "Agent stopped; remaining files not validated");
                break;
            }
            match self.validate_file(file) {
                Ok(result) => results.push(result),
                Err(e) => warn!(file = %file.display(), error = %e, "Skipping file"),
            }
        }
        Ok(results)
    }

    /// Current status
    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            is_active: self.is_active(),
            ..self.status.borrow().clone()
        }
    }

    /// Validation history, oldest first
    pub fn history(&self) -> &[ValidationResult] {
        &self.history
    }

    /// Status plus the first error violations and category advice
    pub fn compliance_snapshot(&self) -> ComplianceSnapshot {
        let recent_errors: Vec<Violation> = self
            .history
            .iter()
            .flat_map(|r| r.violations.iter())
            .filter(|v| v.is_error())
            .take(SNAPSHOT_ERROR_LIMIT)
            .cloned()
            .collect();

        let all: Vec<&Violation> = self.history.iter().flat_map(|r| r.violations.iter()).collect();
        let window = &all[all.len().saturating_sub(SNAPSHOT_RECENT_WINDOW)..];
        let categories: BTreeSet<RuleCategory> = window.iter().map(|v| v.category).collect();
        let recommendations = categories
            .into_iter()
            .map(|c| category_recommendation(c).to_string())
            .collect();

        let status = self.status();
        ComplianceSnapshot {
            compliance_score: status.compliance_score,
            status,
            recent_errors,
            recommendations,
        }
    }

    fn record(&mut self, result: ValidationResult) {
        self.rolling.record(result.score);
        let compliance_score = self.rolling.average();
        self.status.send_modify(|status| {
            status.last_check = Utc::now();
            status.total_files_scanned += 1;
            status.violations_found += result.violations.len() as u64;
            status.compliance_score = compliance_score;
        });

        self.history.push(result);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }
}
