//! The sync orchestrator — sequential reconciliation of an ordered list of
//! configurations against the live item store.
//!
//! ## Run shape
//!
//! 1. For each configuration, in caller order: log a banner, suspend
//!    background materialization, resolve the roots, drive the tree walk,
//!    and report per-root progress.
//! 2. Soft failures are absorbed at the configuration boundary; any other
//!    error stops the loop and the remaining configurations are skipped.
//! 3. The completion notifier runs exactly once afterwards, success or not.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tether_core::types::{ConfigurationName, RootHandle};

use crate::bindings::{BoundConfiguration, CompletionNotifier, ProgressSink};
use crate::error::SyncError;
use crate::suspend::MaterializationGate;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How one configuration fared during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The walk completed with no failures.
    Completed,
    /// The walk completed, but some items were skipped as recoverable
    /// failures.
    CompletedWithSoftFailures,
    /// An unrecoverable error stopped this configuration and the rest of the
    /// run.
    AbortedByFatalError,
}

/// Outcome entry for a single attempted configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationOutcome {
    pub configuration: ConfigurationName,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one orchestrated run.
///
/// The orchestration contract is side-effecting (store mutations, log lines,
/// progress events); this summary exists for front-ends and diagnostics.
/// Configurations skipped after a fatal abort carry no outcome entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_tasks: usize,
    pub outcomes: Vec<ConfigurationOutcome>,
}

impl RunResult {
    /// Overall success: every configuration was attempted and none aborted.
    pub fn completed(&self) -> bool {
        self.outcomes.len() == self.total_tasks
            && self
                .outcomes
                .iter()
                .all(|o| o.outcome != Outcome::AbortedByFatalError)
    }
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// What the run does after a configuration-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Recoverable; move on to the next configuration.
    ContinueRun,
    /// Unrecoverable; skip every remaining configuration.
    AbortRun,
}

/// Classify a configuration-level failure. Only the soft per-item aggregate
/// lets the run continue; no failed configuration is retried within a run.
pub fn classify(error: &SyncError) -> FailureAction {
    if error.is_soft() {
        FailureAction::ContinueRun
    } else {
        FailureAction::AbortRun
    }
}

// ---------------------------------------------------------------------------
// Per-configuration progress
// ---------------------------------------------------------------------------

/// Per-configuration progress state, advanced once per synced root.
///
/// Percent is the share of *roots started*, not of descendant items deep in
/// each subtree; very deep trees understate true progress, which is the
/// defined contract.
struct RootProgress<'a> {
    sink: &'a dyn ProgressSink,
    task_number: usize,
    total_tasks: usize,
    total_roots: usize,
    synced: usize,
}

impl<'a> RootProgress<'a> {
    fn new(
        sink: &'a dyn ProgressSink,
        task_number: usize,
        total_tasks: usize,
        total_roots: usize,
    ) -> Self {
        Self {
            sink,
            task_number,
            total_tasks,
            total_roots,
            synced: 0,
        }
    }

    fn on_root_synced(&mut self, _root: &RootHandle) {
        let percent = percent_of(self.synced, self.total_roots);
        self.sink
            .report_task_progress(self.task_number, self.total_tasks, percent);
        self.synced += 1;
    }

    /// Final tick. The per-root reports top out below 100, so each
    /// configuration that completes its walk is closed out at exactly 100.
    fn finish(self) {
        self.sink
            .report_task_progress(self.task_number, self.total_tasks, 100);
    }
}

fn percent_of(synced: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (synced * 100 / total).min(100) as u8
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives sync runs: owns the materialization gate and the completion
/// notifier, consumes configurations and a progress sink per run.
pub struct SyncOrchestrator {
    gate: MaterializationGate,
    notifier: Arc<dyn CompletionNotifier>,
}

impl SyncOrchestrator {
    pub fn new(notifier: Arc<dyn CompletionNotifier>) -> Self {
        Self::with_gate(MaterializationGate::new(), notifier)
    }

    /// Build against an externally shared gate. The host hands the same gate
    /// to its background materialization subsystem, which polls
    /// [`MaterializationGate::is_suspended`].
    pub fn with_gate(gate: MaterializationGate, notifier: Arc<dyn CompletionNotifier>) -> Self {
        Self { gate, notifier }
    }

    pub fn gate(&self) -> &MaterializationGate {
        &self.gate
    }

    /// Sync every configuration in `configurations`, in order, reporting
    /// progress to `progress`.
    ///
    /// Sequential by design: configurations may share store resources, and
    /// their order may be meaningful to the caller. An empty selection is a
    /// caller-side error (`RegistryError::NoConfigurationsSelected`) raised
    /// by the registry before this method is reached.
    pub fn run_sync(
        &self,
        configurations: &[BoundConfiguration],
        progress: &dyn ProgressSink,
    ) -> RunResult {
        let started_at = Utc::now();
        let total_tasks = configurations.len();
        let mut outcomes = Vec::with_capacity(total_tasks);

        for (index, bound) in configurations.iter().enumerate() {
            let task_number = index + 1;
            let logger = bound.logger.as_ref();

            logger.info("");
            logger.info(&format!("{} is being synced.", bound.name()));

            match self.sync_configuration(bound, task_number, total_tasks, progress) {
                Ok(()) => outcomes.push(ConfigurationOutcome {
                    configuration: bound.name().clone(),
                    outcome: Outcome::Completed,
                    error: None,
                }),
                Err(error) => {
                    // Log in full before any control-flow decision.
                    logger.error(&error);
                    let action = classify(&error);
                    let outcome = match action {
                        FailureAction::ContinueRun => Outcome::CompletedWithSoftFailures,
                        FailureAction::AbortRun => Outcome::AbortedByFatalError,
                    };
                    outcomes.push(ConfigurationOutcome {
                        configuration: bound.name().clone(),
                        outcome,
                        error: Some(error.to_string()),
                    });
                    if action == FailureAction::AbortRun {
                        break;
                    }
                }
            }
        }

        // The notifier always runs, aborted or not, and its failure never
        // unwinds the run or rolls back applied work.
        if let Err(error) = self.notifier.notify(progress, configurations) {
            tracing::error!("sync completion notifier failed: {error}");
            progress.report_exception(&error);
        }

        RunResult {
            started_at,
            finished_at: Utc::now(),
            total_tasks,
            outcomes,
        }
    }

    fn sync_configuration(
        &self,
        bound: &BoundConfiguration,
        task_number: usize,
        total_tasks: usize,
        progress: &dyn ProgressSink,
    ) -> Result<(), SyncError> {
        let _suspended = self.gate.suspend();

        let roots = bound.resolver.resolve_roots(&bound.configuration)?;
        let mut tracker = RootProgress::new(progress, task_number, total_tasks, roots.len());
        bound.synchronizer.sync_tree(
            &bound.configuration,
            &mut |root| tracker.on_root_synced(root),
            &roots,
        )?;
        tracker.finish();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
