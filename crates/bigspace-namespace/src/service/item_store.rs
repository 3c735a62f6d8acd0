//! Item Store
//!
//! Owns the value/status/timestamp record of every item and is the only
//! place item state is mutated.
//!
//! Membership is fixed at construction: the slot vector and the name index
//! are never modified afterwards, so lookups take no lock. Each slot has its
//! own record lock, so writers to different items never contend.
//!
//! Transitions waiting for fan-out sit in a per-item pending queue. At most
//! one caller drains an item's queue at a time, and no store lock is held
//! while it does, so an observer may write to any item (its own included)
//! without blocking.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{ItemRecord, ItemSnapshot, NamespaceConfig, StatusCode};
use crate::error::NamespaceError;
use crate::ports::{SystemTimeSource, TimeSource};
use crate::service::resolver::{FOLDER_NAME, TYPE_NAME};

#[derive(Default)]
struct PendingQueue {
    snapshots: VecDeque<ItemSnapshot>,
    draining: bool,
}

struct ItemSlot {
    name: String,
    record: RwLock<ItemRecord>,
    pending: Mutex<PendingQueue>,
}

impl ItemSlot {
    fn new(name: String) -> Self {
        Self {
            name,
            record: RwLock::new(ItemRecord::default()),
            pending: Mutex::new(PendingQueue::default()),
        }
    }
}

/// What a write left behind for the publishing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Enqueued {
    /// Not a transition, nothing to publish.
    Coalesced,
    /// Queued behind a drain already running for this item.
    Queued,
    /// Queued, and the caller now drains the item's queue.
    Drain,
}

/// Fixed pool of items, in creation order.
pub struct ItemStore {
    slots: Vec<ItemSlot>,
    index: HashMap<String, usize>,
    clock: Arc<dyn TimeSource>,
}

impl ItemStore {
    /// Create the items described by `config`, stamped by the system clock.
    pub fn new(config: &NamespaceConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(config: &NamespaceConfig, clock: Arc<dyn TimeSource>) -> Self {
        let names = (0..config.item_count).map(|i| config.item_name(i));
        Self::from_names(names, clock)
    }

    /// Create a store from explicit names. Duplicates keep their first
    /// position; the folder and type labels are reserved and skipped.
    pub fn from_names<I>(names: I, clock: Arc<dyn TimeSource>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut slots = Vec::new();
        let mut index = HashMap::new();
        for name in names {
            if name == FOLDER_NAME || name == TYPE_NAME {
                warn!(name = %name, "Skipping item named after a reserved node");
                continue;
            }
            if index.contains_key(&name) {
                continue;
            }
            index.insert(name.clone(), slots.len());
            slots.push(ItemSlot::new(name));
        }
        debug!(items = slots.len(), "Item store created");
        Self {
            slots,
            index,
            clock,
        }
    }

    fn slot(&self, name: &str) -> Result<&ItemSlot, NamespaceError> {
        self.index
            .get(name)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| NamespaceError::ItemNotFound {
                name: name.to_string(),
            })
    }

    /// Apply a write, returning whether it was a real transition.
    pub fn set_value(
        &self,
        name: &str,
        value: f64,
        status: StatusCode,
    ) -> Result<bool, NamespaceError> {
        Ok(self.update(name, value, status)?.is_some())
    }

    /// Apply a write, returning the post-transition snapshot taken under the
    /// same lock, or `None` if the write was coalesced.
    pub fn update(
        &self,
        name: &str,
        value: f64,
        status: StatusCode,
    ) -> Result<Option<ItemSnapshot>, NamespaceError> {
        let slot = self.slot(name)?;
        let mut record = slot.record.write();
        if record.apply(value, status, self.clock.now()) {
            Ok(Some(record.snapshot()))
        } else {
            Ok(None)
        }
    }

    pub fn read(&self, name: &str) -> Result<ItemSnapshot, NamespaceError> {
        Ok(self.slot(name)?.record.read().snapshot())
    }

    /// All item names in creation order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.slots.iter().map(|s| s.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Apply a write and queue its snapshot for fan-out.
    ///
    /// The snapshot is queued while the record lock is still held, so queue
    /// order is transition order.
    pub(crate) fn update_and_enqueue(
        &self,
        name: &str,
        value: f64,
        status: StatusCode,
    ) -> Result<Enqueued, NamespaceError> {
        let slot = self.slot(name)?;
        let mut record = slot.record.write();
        if !record.apply(value, status, self.clock.now()) {
            return Ok(Enqueued::Coalesced);
        }

        let mut pending = slot.pending.lock();
        pending.snapshots.push_back(record.snapshot());
        if pending.draining {
            Ok(Enqueued::Queued)
        } else {
            pending.draining = true;
            Ok(Enqueued::Drain)
        }
    }

    /// Pop the next snapshot awaiting fan-out. `None` releases the drain
    /// role taken by [`update_and_enqueue`](Self::update_and_enqueue).
    pub(crate) fn next_pending(&self, name: &str) -> Result<Option<ItemSnapshot>, NamespaceError> {
        let mut pending = self.slot(name)?.pending.lock();
        let next = pending.snapshots.pop_front();
        if next.is_none() {
            pending.draining = false;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamespaceConfigBuilder;
    use crate::ports::ManualTimeSource;
    use chrono::{Duration, TimeZone, Utc};

    fn store_with_clock(count: usize) -> (ItemStore, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let config = NamespaceConfigBuilder::new()
            .item_count(count)
            .build()
            .unwrap();
        (ItemStore::with_time_source(&config, clock.clone()), clock)
    }

    #[test]
    fn test_names_in_creation_order() {
        let (store, _) = store_with_clock(3);
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["DataItem_0000", "DataItem_0001", "DataItem_0002"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_read_unknown_is_not_found() {
        let (store, _) = store_with_clock(1);
        let result = store.read("nope");
        assert!(matches!(result, Err(NamespaceError::ItemNotFound { .. })));
        let result = store.set_value("nope", 1.0, StatusCode::Good);
        assert!(matches!(result, Err(NamespaceError::ItemNotFound { .. })));
    }

    #[test]
    fn test_set_value_coalesces() {
        let (store, clock) = store_with_clock(2);
        let t1 = clock.now();

        assert!(store.set_value("DataItem_0001", 5.0, StatusCode::Good).unwrap());
        clock.advance(Duration::seconds(1));
        assert!(!store.set_value("DataItem_0001", 5.0, StatusCode::Good).unwrap());

        let snap = store.read("DataItem_0001").unwrap();
        assert_eq!(snap.value, 5.0);
        assert_eq!(snap.status, StatusCode::Good);
        assert_eq!(snap.timestamp, Some(t1));
    }

    #[test]
    fn test_update_returns_post_transition_snapshot() {
        let (store, clock) = store_with_clock(1);
        let snap = store
            .update("DataItem_0000", 7.0, StatusCode::Good)
            .unwrap()
            .expect("real change");
        assert_eq!(snap.value, 7.0);
        assert_eq!(snap.timestamp, Some(clock.now()));
    }

    #[test]
    fn test_from_names_skips_duplicates() {
        let store = ItemStore::from_names(
            vec!["b".to_string(), "a".to_string(), "b".to_string()],
            Arc::new(SystemTimeSource),
        );
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_from_names_skips_reserved_labels() {
        let store = ItemStore::from_names(
            vec![
                FOLDER_NAME.to_string(),
                "a".to_string(),
                TYPE_NAME.to_string(),
            ],
            Arc::new(SystemTimeSource),
        );
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["a"]);
        assert!(!store.contains(FOLDER_NAME));
        assert!(!store.contains(TYPE_NAME));
    }

    #[test]
    fn test_single_drainer_per_item() {
        let (store, _) = store_with_clock(2);

        let first = store.update_and_enqueue("DataItem_0000", 1.0, StatusCode::Good);
        assert_eq!(first.unwrap(), Enqueued::Drain);
        // Drain still running: later writes only queue.
        let second = store.update_and_enqueue("DataItem_0000", 2.0, StatusCode::Good);
        assert_eq!(second.unwrap(), Enqueued::Queued);
        let repeat = store.update_and_enqueue("DataItem_0000", 2.0, StatusCode::Good);
        assert_eq!(repeat.unwrap(), Enqueued::Coalesced);
        // Other items have their own queue.
        let other = store.update_and_enqueue("DataItem_0001", 1.0, StatusCode::Good);
        assert_eq!(other.unwrap(), Enqueued::Drain);

        let values: Vec<f64> = std::iter::from_fn(|| store.next_pending("DataItem_0000").unwrap())
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![1.0, 2.0]);

        // Queue emptied, so the next write drains again.
        let third = store.update_and_enqueue("DataItem_0000", 3.0, StatusCode::Good);
        assert_eq!(third.unwrap(), Enqueued::Drain);
    }
}
