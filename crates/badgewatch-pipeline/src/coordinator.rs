//! Run lifecycle coordination.
//!
//! One [`RunCoordinator`] is constructed at startup with its collaborators
//! and owns the single run slot: trigger starts a background run unless one
//! is already active, poll reports the current state without ever blocking
//! on the pipeline, and the outcome is persisted before it becomes visible
//! to pollers.

use std::sync::Arc;

use tokio::sync::RwLock;

use badgewatch_core::{RunReport, RunResult, StatusCheck};

use crate::batch::run_batches;
use crate::error::PipelineError;
use crate::source::parse_catalogue;
use crate::store::{FileStore, ResultStore};

/// Lifecycle of the single modeled run.
#[derive(Debug, Clone)]
enum RunState {
    Idle,
    Running,
    Completed(RunReport),
    Failed(String),
}

/// Synchronous answer to a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    AlreadyRunning,
}

/// Answer to a poll request. Always definite — never a hang.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    NotReady,
    Completed(RunReport),
    Failed(String),
}

/// Tuning for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// File-store name of the catalogue sheet.
    pub source_name: String,
    pub batch_size: usize,
    pub batch_concurrency: usize,
    /// Diagnostic mode: report unchanged products too.
    pub report_unchanged: bool,
}

/// Coordinator handle. Cloning is cheap (all collaborators are shared), and
/// every clone sees the same run slot.
#[derive(Clone)]
pub struct RunCoordinator {
    checker: Arc<dyn StatusCheck>,
    files: Arc<dyn FileStore>,
    results: Arc<dyn ResultStore>,
    settings: Arc<RunSettings>,
    state: Arc<RwLock<RunState>>,
}

impl RunCoordinator {
    #[must_use]
    pub fn new(
        checker: Arc<dyn StatusCheck>,
        files: Arc<dyn FileStore>,
        results: Arc<dyn ResultStore>,
        settings: RunSettings,
    ) -> Self {
        Self {
            checker,
            files,
            results,
            settings: Arc::new(settings),
            state: Arc::new(RwLock::new(RunState::Idle)),
        }
    }

    /// Seeds the state from the persisted result slot so the last outcome
    /// survives a process restart. Absent or unreadable slots leave the
    /// coordinator idle.
    pub async fn recover(&self) {
        match self.results.load().await {
            Ok(Some(RunResult::Completed(report))) => {
                tracing::info!(
                    products = report.products.len(),
                    "recovered completed run result"
                );
                *self.state.write().await = RunState::Completed(report);
            }
            Ok(Some(RunResult::Failed { error })) => {
                tracing::info!(error = %error, "recovered failed run result");
                *self.state.write().await = RunState::Failed(error);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "could not load persisted run result; starting idle");
            }
        }
    }

    /// Starts a background run unless one is already active.
    ///
    /// Returns immediately in both cases; the caller observes completion via
    /// [`RunCoordinator::poll`]. A trigger while running is rejected, not
    /// queued.
    pub async fn trigger(&self) -> TriggerOutcome {
        {
            let mut state = self.state.write().await;
            if matches!(*state, RunState::Running) {
                tracing::info!("run trigger rejected: already in progress");
                return TriggerOutcome::AlreadyRunning;
            }
            *state = RunState::Running;
        }

        let this = self.clone();
        tokio::spawn(async move {
            this.run_once().await;
        });

        TriggerOutcome::Started
    }

    /// Executes one full run in the foreground: pipeline, persist, state
    /// transition. Used by the background task and by the CLI's synchronous
    /// run command.
    pub async fn run_once(&self) -> RunResult {
        let result = match self.run_pipeline().await {
            Ok(report) => {
                tracing::info!(
                    checked = report.checked,
                    updates = report.products.len(),
                    errors = report.errors.len(),
                    "badge status run completed"
                );
                RunResult::Completed(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "badge status run failed");
                RunResult::Failed {
                    error: e.to_string(),
                }
            }
        };

        // Persist first: pollers must never observe a completion that would
        // not survive a restart.
        if let Err(e) = self.results.save(&result).await {
            tracing::error!(error = %e, "failed to persist run result");
            let reason = format!("failed to persist run result: {e}");
            *self.state.write().await = RunState::Failed(reason.clone());
            return RunResult::Failed { error: reason };
        }

        let mut state = self.state.write().await;
        *state = match &result {
            RunResult::Completed(report) => RunState::Completed(report.clone()),
            RunResult::Failed { error } => RunState::Failed(error.clone()),
        };
        drop(state);

        result
    }

    async fn run_pipeline(&self) -> Result<RunReport, PipelineError> {
        let path = self
            .files
            .download(&self.settings.source_name)
            .await
            .map_err(PipelineError::SourceUnavailable)?;

        let rows = parse_catalogue(&path)?;
        tracing::info!(rows = rows.len(), "catalogue sheet loaded");

        self.checker
            .prepare()
            .await
            .map_err(|e| PipelineError::Auth(e.to_string()))?;

        let records = run_batches(
            self.checker.as_ref(),
            &rows,
            self.settings.batch_size,
            self.settings.batch_concurrency,
        )
        .await;

        Ok(RunReport::from_records(
            &records,
            self.settings.report_unchanged,
        ))
    }

    /// Reports the current state. Read-only and non-blocking: while a run is
    /// active this returns `NotReady` instead of waiting.
    pub async fn poll(&self) -> PollOutcome {
        match &*self.state.read().await {
            RunState::Idle | RunState::Running => PollOutcome::NotReady,
            RunState::Completed(report) => PollOutcome::Completed(report.clone()),
            RunState::Failed(reason) => PollOutcome::Failed(reason.clone()),
        }
    }
}
