//! Suspension gate for the background materialization subsystem.
//!
//! Background materialization lazily pushes serialized items into the live
//! store outside of explicit runs. While an orchestrated sync is writing the
//! same subtrees, that mechanism has to stand down or the two write paths
//! race. The gate is a reference-counted scope depth: the subsystem polls
//! [`MaterializationGate::is_suspended`] and stays idle while any
//! [`SuspensionGuard`] is live.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared suspend/resume gate. Cheap to clone; clones observe the same depth.
#[derive(Debug, Clone, Default)]
pub struct MaterializationGate {
    depth: Arc<AtomicUsize>,
}

impl MaterializationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend background materialization until the returned guard drops.
    /// Guards nest; the gate stays suspended until the last one is gone.
    #[must_use = "the gate resumes as soon as the guard drops"]
    pub fn suspend(&self) -> SuspensionGuard {
        self.depth.fetch_add(1, Ordering::SeqCst);
        SuspensionGuard {
            depth: Arc::clone(&self.depth),
        }
    }

    /// True while at least one suspension guard is live.
    pub fn is_suspended(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

/// RAII guard holding the gate suspended. Dropping it, on any exit path
/// including unwinding, releases one level of suspension.
#[derive(Debug)]
pub struct SuspensionGuard {
    depth: Arc<AtomicUsize>,
}

impl Drop for SuspensionGuard {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspended_only_while_a_guard_is_live() {
        let gate = MaterializationGate::new();
        assert!(!gate.is_suspended());
        let guard = gate.suspend();
        assert!(gate.is_suspended());
        drop(guard);
        assert!(!gate.is_suspended());
    }

    #[test]
    fn nested_guards_keep_the_gate_suspended() {
        let gate = MaterializationGate::new();
        let outer = gate.suspend();
        let inner = gate.suspend();
        drop(inner);
        assert!(gate.is_suspended(), "outer guard still live");
        drop(outer);
        assert!(!gate.is_suspended());
    }

    #[test]
    fn clones_observe_the_same_depth() {
        let gate = MaterializationGate::new();
        let observer = gate.clone();
        let _guard = gate.suspend();
        assert!(observer.is_suspended());
    }

    #[test]
    fn released_when_a_panic_unwinds_through_the_scope() {
        let gate = MaterializationGate::new();
        let inner = gate.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.suspend();
            panic!("walk blew up");
        });
        assert!(result.is_err());
        assert!(!gate.is_suspended());
    }
}
