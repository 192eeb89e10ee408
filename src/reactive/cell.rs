//! Single-writer reactive cells
//!
//! Values are stored as `Arc<T>` snapshots. A write swaps the snapshot and
//! bumps the version under one lock, so readers never see a torn value.
//! Subscribers run after the lock is released.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique cell identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    fn next() -> Self {
        CellId(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change callback
pub type Subscriber<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

/// Subscriber list shared by cells and memo cells
pub(crate) struct Subscribers<T> {
    next_id: AtomicU64,
    list: RwLock<Vec<(SubscriptionId, Subscriber<T>)>>,
}

impl<T> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            list: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, subscriber: Subscriber<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.list.write().push((id, subscriber));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut list = self.list.write();
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        list.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.list.read().len()
    }

    /// Call every subscriber with `value`, outside the list lock
    pub(crate) fn notify(&self, value: &Arc<T>) {
        let snapshot: Vec<Subscriber<T>> =
            self.list.read().iter().map(|(_, s)| Arc::clone(s)).collect();
        for subscriber in snapshot {
            subscriber(value);
        }
    }
}

/// Anything whose changes are observable as a version number
pub(crate) trait Versioned: Send + Sync {
    fn id(&self) -> CellId;
    fn version(&self) -> u64;
}

struct Slot<T> {
    value: Arc<T>,
    version: u64,
}

struct CellInner<T> {
    id: CellId,
    slot: RwLock<Slot<T>>,
    subscribers: Subscribers<T>,
}

impl<T: Send + Sync> Versioned for CellInner<T> {
    fn id(&self) -> CellId {
        self.id
    }

    fn version(&self) -> u64 {
        self.slot.read().version
    }
}

/// The writer side of a reactive cell
///
/// Not `Clone`: whoever owns it is the only writer. Hand out `CellReader`s
/// to consumers.
pub struct ReactiveCell<T> {
    inner: Arc<CellInner<T>>,
}

impl<T: Send + Sync + 'static> ReactiveCell<T> {
    /// Create a cell holding `value` at version 0
    pub fn new(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Create a cell around an existing shared value
    pub fn from_arc(value: Arc<T>) -> Self {
        Self {
            inner: Arc::new(CellInner {
                id: CellId::next(),
                slot: RwLock::new(Slot { value, version: 0 }),
                subscribers: Subscribers::new(),
            }),
        }
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.set_arc(Arc::new(value));
    }

    /// Replace the value with a shared snapshot and notify subscribers
    pub fn set_arc(&self, value: Arc<T>) {
        {
            let mut slot = self.inner.slot.write();
            slot.value = Arc::clone(&value);
            slot.version += 1;
        }
        self.inner.subscribers.notify(&value);
    }

    /// Derive the next value from the current one atomically, then notify
    pub fn update<F>(&self, f: F) -> Arc<T>
    where
        F: FnOnce(&T) -> T,
    {
        let value = {
            let mut slot = self.inner.slot.write();
            let next = Arc::new(f(&slot.value));
            slot.value = Arc::clone(&next);
            slot.version += 1;
            next
        };
        self.inner.subscribers.notify(&value);
        value
    }

    /// Current value
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.inner.slot.read().value)
    }

    /// Number of writes so far
    pub fn version(&self) -> u64 {
        self.inner.slot.read().version
    }

    /// A read-only handle for consumers
    pub fn reader(&self) -> CellReader<T> {
        CellReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only handle to a reactive cell
pub struct CellReader<T> {
    inner: Arc<CellInner<T>>,
}

impl<T> Clone for CellReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> CellReader<T> {
    /// Cell identifier
    pub fn id(&self) -> CellId {
        self.inner.id
    }

    /// Current value
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.inner.slot.read().value)
    }

    /// Number of writes so far
    pub fn version(&self) -> u64 {
        self.inner.slot.read().version
    }

    /// Value and version read under one lock
    pub(crate) fn snapshot(&self) -> (Arc<T>, u64) {
        let slot = self.inner.slot.read();
        (Arc::clone(&slot.value), slot.version)
    }

    pub(crate) fn versioned(&self) -> Arc<dyn Versioned> {
        self.inner.clone()
    }

    /// Call `f` with each new value
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

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_set_bumps_version_and_notifies() {
        let cell = ReactiveCell::new(1);
        let reader = cell.reader();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reader.subscribe(move |value| sink.lock().push(**value));

        cell.set(2);
        cell.set(3);

        assert_eq!(*reader.get(), 3);
        assert_eq!(reader.version(), 2);
        assert_eq!(*seen.lock(), vec![2, 3]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let cell = ReactiveCell::new("a".to_string());
        let reader = cell.reader();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let id = reader.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cell.set("b".to_string());
        assert!(reader.unsubscribe(id));
        assert!(!reader.unsubscribe(id));
        cell.set("c".to_string());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(reader.subscriber_count(), 0);
    }

    #[test]
    fn test_snapshot_survives_later_writes() {
        let cell = ReactiveCell::new(vec![1, 2, 3]);
        let before = cell.reader().get();
        cell.set(vec![4]);
        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*cell.get(), vec![4]);
    }

    #[test]
    fn test_subscriber_may_read_cell() {
        let cell = ReactiveCell::new(0u64);
        let reader = cell.reader();
        let observed = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&observed);
        let inner_reader = reader.clone();
        reader.subscribe(move |_| {
            sink.store(*inner_reader.get(), Ordering::SeqCst);
        });

        cell.update(|n| n + 5);
        assert_eq!(observed.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_cell_ids_are_unique() {
        let a = ReactiveCell::new(());
        let b = ReactiveCell::new(());
        assert_ne!(a.reader().id(), b.reader().id());
    }
}
