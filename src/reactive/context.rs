//! Read contexts for memoized computations
//!
//! A computation reads its inputs through a `ReadContext`. Tracked reads
//! become dependencies: a later write to any of them makes the cached result
//! stale. Untracked reads use the current value and are forgotten.

use std::sync::Arc;

use super::cell::{CellId, CellReader, Versioned};

/// An input observed by a computation, with the version it saw
pub(crate) struct Dependency {
    source: Arc<dyn Versioned>,
    version: u64,
}

impl Dependency {
    pub(crate) fn is_current(&self) -> bool {
        self.source.version() == self.version
    }
}

/// Records which cells a computation depends on
#[derive(Default)]
pub struct ReadContext {
    tracked: Vec<Dependency>,
}

impl ReadContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Read `cell` and register it as a dependency
    pub fn tracked_read<T: Send + Sync + 'static>(&mut self, cell: &CellReader<T>) -> Arc<T> {
        let (value, version) = cell.snapshot();
        if !self.is_tracking(cell.id()) {
            self.tracked.push(Dependency {
                source: cell.versioned(),
                version,
            });
        }
        value
    }

    /// Read `cell` without registering a dependency
    pub fn untracked_read<T: Send + Sync + 'static>(&self, cell: &CellReader<T>) -> Arc<T> {
        cell.get()
    }

    /// True if `id` has been read through `tracked_read`
    pub fn is_tracking(&self, id: CellId) -> bool {
        self.tracked.iter().any(|dep| dep.source.id() == id)
    }

    /// Number of tracked dependencies
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub(crate) fn into_dependencies(self) -> Vec<Dependency> {
        self.tracked
    }
}
