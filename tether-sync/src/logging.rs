//! Log-facade-backed default collaborators.
//!
//! Hosts that only need the standard log stream can assemble a run from
//! these instead of writing every collaborator themselves: a per-
//! configuration [`FacadeLogger`], a [`LogProgressSink`], and a
//! [`LoggingNotifier`] that emits a run summary line.

use tether_core::types::ConfigurationName;

use crate::bindings::{BoundConfiguration, CompletionNotifier, ProgressSink, SyncLogger};
use crate::error::SyncError;

/// Logger bound to one configuration, writing `[<name>] message` lines
/// through the `log` facade. An empty message is passed through as-is so the
/// orchestrator's separator lines stay blank.
pub struct FacadeLogger {
    name: ConfigurationName,
}

impl FacadeLogger {
    pub fn new(name: ConfigurationName) -> Self {
        Self { name }
    }
}

impl SyncLogger for FacadeLogger {
    fn info(&self, message: &str) {
        if message.is_empty() {
            tracing::info!("");
        } else {
            tracing::info!("[{}] {}", self.name, message);
        }
    }

    fn error(&self, error: &SyncError) {
        tracing::error!("[{}] {}", self.name, error);
    }
}

/// Progress sink that mirrors task progress into the log stream.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn report_task_progress(&self, task_number: usize, total_tasks: usize, percent: u8) {
        tracing::debug!("task {task_number}/{total_tasks}: {percent}%");
    }

    fn report_exception(&self, error: &SyncError) {
        tracing::error!("{error}");
    }
}

/// Notifier that logs a completion summary for the run.
pub struct LoggingNotifier;

impl CompletionNotifier for LoggingNotifier {
    fn notify(
        &self,
        _progress: &dyn ProgressSink,
        configurations: &[BoundConfiguration],
    ) -> Result<(), SyncError> {
        let names: Vec<String> = configurations
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        tracing::info!(
            "sync run finished for {} configuration(s): {}",
            names.len(),
            names.join(", ")
        );
        Ok(())
    }
}
