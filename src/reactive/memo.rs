//! Memoized computations gated by an explicit trigger
//!
//! A `MemoCell` keeps one cache entry tagged with the trigger version it was
//! computed for. The entry is fresh while the trigger version and every
//! tracked dependency are unchanged; parameters read with
//! `ReadContext::untracked_read` never invalidate it. Firing the trigger
//! makes the entry stale at once, and if anyone is subscribed the routine
//! reruns straight away so subscribers see the result of that trigger.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::cell::{CellReader, ReactiveCell, SubscriptionId, Subscribers};
use super::context::{Dependency, ReadContext};

/// Monotonic counter whose increment is the signal to recompute
pub struct Trigger {
    cell: ReactiveCell<u64>,
}

impl Trigger {
    /// A trigger at version 0
    pub fn new() -> Self {
        Self {
            cell: ReactiveCell::new(0),
        }
    }

    /// Increment the trigger version and return it
    pub fn fire(&self) -> u64 {
        *self.cell.update(|version| version + 1)
    }

    /// Current trigger version
    pub fn version(&self) -> u64 {
        *self.cell.get()
    }

    /// Read-only handle to the counter
    pub fn reader(&self) -> CellReader<u64> {
        self.cell.reader()
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

type Routine<T> = Box<dyn Fn(&mut ReadContext) -> T + Send + Sync>;

struct CacheEntry<T> {
    trigger_version: u64,
    dependencies: Vec<Dependency>,
    value: Arc<T>,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, trigger_version: u64) -> bool {
        self.trigger_version == trigger_version
            && self.dependencies.iter().all(Dependency::is_current)
    }
}

struct MemoInner<T> {
    trigger: CellReader<u64>,
    routine: Routine<T>,
    entry: Mutex<Option<CacheEntry<T>>>,
    invocations: AtomicU64,
    subscribers: Subscribers<T>,
}

impl<T: Send + Sync + 'static> MemoInner<T> {
    fn is_fresh(&self) -> bool {
        let current = *self.trigger.get();
        self.entry
            .lock()
            .as_ref()
            .is_some_and(|entry| entry.is_fresh(current))
    }

    fn evaluate(&self) -> Arc<T> {
        let trigger_version = *self.trigger.get();
        let mut entry = self.entry.lock();
        if let Some(cached) = entry.as_ref().filter(|e| e.is_fresh(trigger_version)) {
            tracing::debug!(trigger_version, "Memo cache hit");
            return Arc::clone(&cached.value);
        }

        tracing::debug!(trigger_version, "Memo recomputing");
        let mut ctx = ReadContext::new();
        let value = Arc::new((self.routine)(&mut ctx));
        self.invocations.fetch_add(1, Ordering::SeqCst);
        *entry = Some(CacheEntry {
            trigger_version,
            dependencies: ctx.into_dependencies(),
            value: Arc::clone(&value),
        });
        drop(entry);

        self.subscribers.notify(&value);
        value
    }
}

/// An expensive computation cached until its trigger fires
pub struct MemoCell<T> {
    inner: Arc<MemoInner<T>>,
    trigger_subscription: SubscriptionId,
}

impl<T: Send + Sync + 'static> MemoCell<T> {
    /// Wrap `routine`, recomputing only when `trigger` fires (or a tracked
    /// read changes)
    pub fn new<F>(trigger: &Trigger, routine: F) -> Self
    where
        F: Fn(&mut ReadContext) -> T + Send + Sync + 'static,
    {
        let inner = Arc::new(MemoInner {
            trigger: trigger.reader(),
            routine: Box::new(routine),
            entry: Mutex::new(None),
            invocations: AtomicU64::new(0),
            subscribers: Subscribers::new(),
        });

        let weak = Arc::downgrade(&inner);
        let trigger_subscription = inner.trigger.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                if !inner.subscribers.is_empty() {
                    inner.evaluate();
                }
            }
        });

        Self {
            inner,
            trigger_subscription,
        }
    }

    /// Cached value, recomputing first if stale
    pub fn get(&self) -> Arc<T> {
        self.inner.evaluate()
    }

    /// True if `get` would return without running the routine
    pub fn is_fresh(&self) -> bool {
        self.inner.is_fresh()
    }

    /// How many times the routine has run
    pub fn invocations(&self) -> u64 {
        self.inner.invocations.load(Ordering::SeqCst)
    }

    /// Call `f` with each recomputed value
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        self.inner.subscribers.add(Arc::new(f))
    }

    /// Stop notifying a subscriber; false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.remove(id)
    }
}

impl<T> Drop for MemoCell<T> {
    fn drop(&mut self) {
        self.inner.trigger.unsubscribe(self.trigger_subscription);
    }
}
