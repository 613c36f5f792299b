//! Error types for tether-sync.

use std::path::PathBuf;

use thiserror::Error;

use tether_core::error::RegistryError;
use tether_core::types::{ConfigurationName, ItemPath};

/// One serialized item that failed to deserialize or apply during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item: ItemPath,
    pub message: String,
}

/// Aggregate of recoverable per-item failures. The walk that raised it still
/// completed; the run may continue with the next configuration.
#[derive(Debug, Error)]
#[error("{} serialized item(s) could not be applied", .failures.len())]
pub struct SoftFailureAggregate {
    pub failures: Vec<ItemFailure>,
}

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Recoverable: some items failed, but the tree walk completed.
    #[error(transparent)]
    Soft(#[from] SoftFailureAggregate),

    /// Root resolution failed for a configuration (e.g. predicate
    /// misconfiguration).
    #[error("failed to resolve roots for '{configuration}': {message}")]
    RootResolution {
        configuration: ConfigurationName,
        message: String,
    },

    /// The tree walk failed outright.
    #[error("tree sync failed for '{configuration}': {message}")]
    TreeSync {
        configuration: ConfigurationName,
        message: String,
    },

    /// An error from the configuration registry.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// JSON serialization/deserialization error (run report).
    #[error("run report JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An implementation-defined failure from an external collaborator.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SyncError {
    /// Recoverable failures let the run continue with the next
    /// configuration; everything else halts it.
    pub fn is_soft(&self) -> bool {
        matches!(self, SyncError::Soft(_))
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
