//! Agent Runner
//!
//! Drives the validation service on a schedule:
//! - `start()` activates the service, runs one pass and awaits it, then
//!   spawns a timer task repeating the pass every `check_interval_ms`
//! - `stop()` deactivates the service, cancels the timer and waits until the
//!   timer task has exited
//!
//! Each pass writes its report and then runs the auto-fixer when enabled.
//! A report that cannot be written fails the pass, but only after the fixer
//! has run.
//!
//! Passes never overlap. The timer task finishes one pass before it waits for
//! the next tick, and an on-demand [`AgentRunner::run_pass`] that collides
//! with a running pass is skipped.

use crate::config::AgentConfig;
use crate::events::AgentEvent;
use crate::fixer::{AutoFixer, FixSummary};
use crate::reporter::{ReportGenerator, ReportOutput};
use crate::scoring::average_score;
use crate::service::{
    ActivationHandle, AgentStatus, ComplianceSnapshot, ValidationResult, ValidationService,
};
use crate::{AgentError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Lifecycle phase of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerPhase {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// What one pass did
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub files_validated: usize,
    pub violations: usize,
    /// Rounded mean of this pass's file scores
    pub average_score: u8,
    pub report: ReportOutput,
    /// Present when auto-fix is enabled
    pub fixes: Option<FixSummary>,
}

/// Everything a pass needs, shared between the runner and its timer task
#[derive(Clone)]
struct PassExecutor {
    config: Arc<AgentConfig>,
    service: Arc<Mutex<ValidationService>>,
    reporter: ReportGenerator,
    fixer: AutoFixer,
    in_progress: Arc<AtomicBool>,
    passes: Arc<AtomicU64>,
}

/// Clears the in-progress flag when the pass ends, however it ends
struct PassGuard(Arc<AtomicBool>);

impl Drop for PassGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PassExecutor {
    /// Run one pass; `Ok(None)` when another pass was already running
    async fn run(&self) -> Result<Option<PassSummary>> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            debug!("Validation pass already running; skipping");
            return Ok(None);
        }
        let guard = PassGuard(Arc::clone(&self.in_progress));

        let executor = self.clone();
        let summary = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            executor.execute()
        })
        .await
        .map_err(|e| AgentError::Internal(format!("Validation pass panicked: {e}")))??;

        Ok(Some(summary))
    }

    fn execute(&self) -> Result<PassSummary> {
        info!(
            roots = self.config.watch_directories.len(),
            "Running design compliance validation"
        );

        let results = {
            let mut service = lock(&self.service)?;
            let mut results: Vec<ValidationResult> = Vec::new();
            for root in &self.config.watch_directories {
                results.extend(service.validate_directory(root)?);
            }
            results
        };

        let report = self.reporter.emit(&results, self.config.report_format);
        if let Err(e) = &report {
            error!(error = %e, "Could not emit validation report");
        }

        let fixes = if self.config.auto_fix {
            info!("Attempting to auto-fix violations");
            Some(self.fixer.fix_results(&results))
        } else {
            None
        };
        let report = report?;

        let summary = PassSummary {
            files_validated: results.len(),
            violations: results.iter().map(|r| r.violations.len()).sum(),
            average_score: average_score(results.iter().map(|r| r.score)),
            report,
            fixes,
        };
        self.passes.fetch_add(1, Ordering::SeqCst);
        info!(
            files = summary.files_validated,
            violations = summary.violations,
            score = summary.average_score,
            "Validation pass complete"
        );
        Ok(summary)
    }
}

fn lock(service: &Mutex<ValidationService>) -> Result<MutexGuard<'_, ValidationService>> {
    service
        .lock()
        .map_err(|_| AgentError::Internal("Validation service lock poisoned".to_string()))
}

/// Background tasks owned by a running runner
struct Tasks {
    cancel_token: CancellationToken,
    timer: JoinHandle<()>,
    event_log: JoinHandle<()>,
}

/// Scheduled design compliance agent
pub struct AgentRunner {
    executor: PassExecutor,
    activation: ActivationHandle,
    status: watch::Receiver<AgentStatus>,
    phase: Mutex<RunnerPhase>,
    /// Serializes `start()` and `stop()`
    tasks: tokio::sync::Mutex<Option<Tasks>>,
}

impl AgentRunner {
    /// Build a runner and its validation service from configuration
    pub fn new(config: AgentConfig) -> Result<Self> {
        let service = ValidationService::from_config(&config)?;
        Ok(Self::with_service(config, service))
    }

    /// Build a runner around an existing service
    pub fn with_service(config: AgentConfig, service: ValidationService) -> Self {
        let activation = service.activation_handle();
        let status = service.watch_status();
        let reporter = ReportGenerator::new(&config.reports_dir);
        Self {
            executor: PassExecutor {
                config: Arc::new(config),
                service: Arc::new(Mutex::new(service)),
                reporter,
                fixer: AutoFixer::new(),
                in_progress: Arc::new(AtomicBool::new(false)),
                passes: Arc::new(AtomicU64::new(0)),
            },
            activation,
            status,
            phase: Mutex::new(RunnerPhase::Stopped),
            tasks: tokio::sync::Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.executor.config
    }

    pub fn phase(&self) -> RunnerPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: RunnerPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Number of passes that ran to completion
    pub fn passes_completed(&self) -> u64 {
        self.executor.passes.load(Ordering::SeqCst)
    }

    /// Start the agent
    ///
    /// The first pass has finished when this returns. If it fails the agent
    /// is stopped again and the error is returned.
    pub async fn start(&self) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        if matches!(self.phase(), RunnerPhase::Running | RunnerPhase::Starting) {
            info!("Designer agent is already running");
            return Ok(());
        }

        self.set_phase(RunnerPhase::Starting);
        info!(
            interval_ms = self.executor.config.check_interval_ms,
            roots = ?self.executor.config.watch_directories,
            "Starting designer agent"
        );

        let cancel_token = CancellationToken::new();
        let events = match lock(&self.executor.service) {
            Ok(mut service) => {
                let events = service.subscribe();
                service.start();
                events
            }
            Err(e) => {
                self.set_phase(RunnerPhase::Stopped);
                return Err(e);
            }
        };
        let event_log = tokio::spawn(log_events(events, cancel_token.clone()));

        if let Err(e) = self.executor.run().await {
            error!(error = %e, "Initial validation pass failed");
            self.activation.deactivate();
            cancel_token.cancel();
            let _ = event_log.await;
            if let Ok(mut service) = lock(&self.executor.service) {
                service.stop();
            }
            self.set_phase(RunnerPhase::Stopped);
            return Err(e);
        }

        let timer = tokio::spawn(run_timer(self.executor.clone(), cancel_token.clone()));
        *tasks = Some(Tasks {
            cancel_token,
            timer,
            event_log,
        });
        self.set_phase(RunnerPhase::Running);
        Ok(())
    }

    /// Stop the agent
    ///
    /// No new file is validated once this is called. The timer task has
    /// exited when this returns.
    pub async fn stop(&self) {
        let mut tasks = self.tasks.lock().await;
        if self.phase() == RunnerPhase::Stopped {
            debug!("Designer agent is not running");
            return;
        }

        self.set_phase(RunnerPhase::Stopping);
        self.activation.deactivate();

        if let Some(tasks) = tasks.take() {
            tasks.cancel_token.cancel();
            if let Err(e) = tasks.timer.await {
                warn!(error = %e, "Timer task ended abnormally");
            }
            if let Err(e) = tasks.event_log.await {
                warn!(error = %e, "Event log task ended abnormally");
            }
        }

        match lock(&self.executor.service) {
            Ok(mut service) => service.stop(),
            Err(e) => error!(error = %e, "Could not mark service stopped"),
        }
        self.set_phase(RunnerPhase::Stopped);
    }

    /// Run a pass now
    ///
    /// Returns `Ok(None)` when a pass is already running and
    /// [`AgentError::InactiveAgent`] when the agent is not started.
    pub async fn run_pass(&self) -> Result<Option<PassSummary>> {
        self.executor.run().await
    }

    /// Validate a single file through the shared service
    pub async fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidationResult> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let service = Arc::clone(&self.executor.service);
        tokio::task::spawn_blocking(move || {
            let mut service = lock(&service)?;
            service.validate_file(&path)
        })
        .await
        .map_err(|e| AgentError::Internal(format!("File validation panicked: {e}")))?
    }

    /// Latest status; never waits for a running pass
    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            is_active: self.activation.is_active(),
            ..self.status.borrow().clone()
        }
    }

    /// Blocks until a running pass has finished with the service
    pub fn compliance_snapshot(&self) -> Result<ComplianceSnapshot> {
        Ok(lock(&self.executor.service)?.compliance_snapshot())
    }

    /// Validation history, oldest first
    ///
    /// Blocks until a running pass has finished with the service.
    pub fn history(&self) -> Result<Vec<ValidationResult>> {
        Ok(lock(&self.executor.service)?.history().to_vec())
    }
}

async fn run_timer(executor: PassExecutor, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(executor.config.check_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires at once; the initial pass already covered it.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                match executor.run().await {
                    Ok(Some(_)) => {}
                    Ok(None) => debug!("Scheduled pass skipped"),
                    Err(AgentError::InactiveAgent) if cancel_token.is_cancelled() => break,
                    Err(e) => error!(error = %e, "Scheduled validation pass failed"),
                }
            }
        }
    }
    debug!("Timer task exited");
}

async fn log_events(
    mut events: tokio::sync::broadcast::Receiver<AgentEvent>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            event = events.recv() => match event {
                Ok(AgentEvent::ValidationComplete(result)) if !result.violations.is_empty() => {
                    warn!(
                        file = %result.file.display(),
                        violations = result.violations.len(),
                        score = result.score,
                        "Design violations found"
                    );
                }
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => debug!(missed, "Event log lagging"),
                Err(RecvError::Closed) => break,
            },
        }
    }
}
