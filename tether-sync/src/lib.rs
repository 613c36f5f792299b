//! # tether-sync
//!
//! Sequential sync orchestration over named configurations.
//!
//! A run walks an ordered list of [`BoundConfiguration`]s, pushes each
//! configuration's serialized roots into the live store through its
//! [`TreeSynchronizer`], reports per-root progress, absorbs soft failures at
//! the configuration boundary, halts on anything fatal, and notifies exactly
//! once at the end. Call [`SyncOrchestrator::run_sync`].

pub mod bindings;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod report;
pub mod suspend;

pub use bindings::{
    BoundConfiguration, CompletionNotifier, ProgressSink, RootResolver, SyncLogger,
    TreeSynchronizer,
};
pub use error::{ItemFailure, SoftFailureAggregate, SyncError};
pub use orchestrator::{
    classify, ConfigurationOutcome, FailureAction, Outcome, RunResult, SyncOrchestrator,
};
pub use suspend::{MaterializationGate, SuspensionGuard};
