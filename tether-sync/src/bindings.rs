//! Collaborator contracts for a sync run.
//!
//! A run consumes each configuration through its *capability bindings*: the
//! logger, root resolver, and tree synchronizer resolved for it before the
//! run starts. The orchestrator never reaches for ambient state; everything
//! it calls on a configuration's behalf hangs off [`BoundConfiguration`].

use std::sync::Arc;

use tether_core::types::{Configuration, ConfigurationName, RootHandle};

use crate::error::SyncError;

/// Logger bound to one configuration. Logging must not fail.
pub trait SyncLogger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, error: &SyncError);
}

/// Produces the ordered set of top-level serialized items ("roots") for one
/// configuration. Any error raised here is fatal to the run.
pub trait RootResolver: Send + Sync {
    fn resolve_roots(&self, configuration: &Configuration) -> Result<Vec<RootHandle>, SyncError>;
}

/// Walks each root's serialized subtree and applies its items to the live
/// store, invoking `on_root_synced` once per completed root.
pub trait TreeSynchronizer: Send + Sync {
    fn sync_tree(
        &self,
        configuration: &Configuration,
        on_root_synced: &mut dyn FnMut(&RootHandle),
        roots: &[RootHandle],
    ) -> Result<(), SyncError>;
}

/// Sink for discrete progress updates and surfaced errors.
///
/// Purely observational: nothing reported here affects control flow. Calls
/// must not block indefinitely and must tolerate one call per root,
/// potentially thousands per run.
pub trait ProgressSink: Send + Sync {
    fn report_task_progress(&self, task_number: usize, total_tasks: usize, percent: u8);
    fn report_exception(&self, error: &SyncError);
}

/// Invoked exactly once after every configuration has been attempted,
/// whether the run completed fully or aborted early.
pub trait CompletionNotifier: Send + Sync {
    fn notify(
        &self,
        progress: &dyn ProgressSink,
        configurations: &[BoundConfiguration],
    ) -> Result<(), SyncError>;
}

/// A configuration paired with the capability bindings resolved for it.
///
/// Immutable for the duration of a run; assembled by the host before
/// [`crate::SyncOrchestrator::run_sync`] is invoked and discarded after.
#[derive(Clone)]
pub struct BoundConfiguration {
    pub configuration: Configuration,
    pub logger: Arc<dyn SyncLogger>,
    pub resolver: Arc<dyn RootResolver>,
    pub synchronizer: Arc<dyn TreeSynchronizer>,
}

impl BoundConfiguration {
    pub fn name(&self) -> &ConfigurationName {
        &self.configuration.name
    }
}
