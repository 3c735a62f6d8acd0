//! Subscription Registry
//!
//! Maps item name to the observers registered for it. Entries live in a
//! `DashMap`, so subscribe/unsubscribe on one item only contends with
//! traffic on items sharing its shard, never with item store writes.
//!
//! Fan-out clones the observer list under the shard lock and invokes the
//! callbacks after releasing it. A subscribe that has returned is therefore
//! visible to every later notify, and an unsubscribe that has returned is
//! excluded from every later notify.

use dashmap::DashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{FanOutReport, ItemSnapshot, SubscriptionToken};
use crate::error::{NamespaceError, ObserverError};
use crate::metrics::MetricsRecorder;
use crate::ports::Observer;
use crate::service::ItemStore;

#[derive(Clone)]
struct Registration {
    token: SubscriptionToken,
    observer: Arc<dyn Observer>,
}

impl Registration {
    fn is_same_observer(&self, observer: &Arc<dyn Observer>) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.observer) as *const (),
            Arc::as_ptr(observer) as *const (),
        )
    }
}

pub struct SubscriptionRegistry {
    observers: DashMap<String, Vec<Registration>>,
    id_counter: AtomicU64,
    store: Arc<ItemStore>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<ItemStore>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            observers: DashMap::new(),
            id_counter: AtomicU64::new(1),
            store,
            metrics,
        }
    }

    /// Register `observer` for `item`.
    ///
    /// Subscribing the same observer (same `Arc`) to the same item again
    /// returns the existing token.
    pub fn subscribe(
        &self,
        item: &str,
        observer: Arc<dyn Observer>,
    ) -> Result<SubscriptionToken, NamespaceError> {
        if !self.store.contains(item) {
            return Err(NamespaceError::ItemNotFound {
                name: item.to_string(),
            });
        }

        let mut entry = self.observers.entry(item.to_string()).or_default();
        if let Some(existing) = entry.iter().find(|r| r.is_same_observer(&observer)) {
            return Ok(existing.token.clone());
        }

        let token = SubscriptionToken {
            id: self.id_counter.fetch_add(1, Ordering::SeqCst),
            item: item.to_string(),
        };
        entry.push(Registration {
            token: token.clone(),
            observer,
        });

        debug!(
            subscription = %token,
            observers = entry.len(),
            "Created subscription"
        );
        Ok(token)
    }

    /// Remove a subscription, pruning the item's entry when it was the last.
    ///
    /// Returns `false` if the token was not registered.
    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        let removed = match self.observers.get_mut(&token.item) {
            Some(mut entry) => {
                let before = entry.len();
                entry.retain(|r| r.token.id != token.id);
                before != entry.len()
            }
            None => false,
        };

        // Re-checked under the shard lock: a concurrent subscribe keeps the entry.
        if self
            .observers
            .remove_if(&token.item, |_, regs| regs.is_empty())
            .is_some()
        {
            debug!(item = %token.item, "Pruned empty observer set");
        }

        if removed {
            debug!(subscription = %token, "Removed subscription");
        }
        removed
    }

    /// Deliver `snapshot` to every observer currently registered for `item`.
    ///
    /// A failing or panicking observer does not stop delivery to the others;
    /// failures are collected in the report.
    pub fn notify(&self, item: &str, snapshot: &ItemSnapshot) -> FanOutReport {
        let targets: Vec<Registration> = match self.observers.get(item) {
            Some(entry) => entry.value().clone(),
            None => return FanOutReport::default(),
        };

        let mut report = FanOutReport::default();
        for registration in targets {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                registration.observer.on_change(item, snapshot)
            }))
            .unwrap_or_else(|payload| Err(ObserverError::Panicked(panic_message(payload))));

            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(subscription = %registration.token, error = %e, "Observer failed");
                    report.failed.push((registration.token, e));
                }
            }
        }

        self.metrics
            .record_fan_out(report.delivered, report.failed.len());
        report
    }

    /// Observers registered for `item`.
    pub fn observer_count(&self, item: &str) -> usize {
        self.observers.get(item).map(|e| e.len()).unwrap_or(0)
    }

    /// Items with at least one observer.
    pub fn watched_items(&self) -> usize {
        self.observers.len()
    }

    pub fn total_subscriptions(&self) -> usize {
        self.observers.iter().map(|e| e.len()).sum()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NamespaceConfigBuilder, StatusCode};
    use crate::metrics::NoOpMetrics;
    use parking_lot::Mutex;

    fn registry() -> SubscriptionRegistry {
        let config = NamespaceConfigBuilder::new().item_count(3).build().unwrap();
        SubscriptionRegistry::new(Arc::new(ItemStore::new(&config)), Arc::new(NoOpMetrics))
    }

    fn snapshot(value: f64) -> ItemSnapshot {
        ItemSnapshot {
            value,
            status: StatusCode::Good,
            timestamp: None,
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, f64)>>,
    }

    impl Observer for Recorder {
        fn on_change(&self, item: &str, snapshot: &ItemSnapshot) -> Result<(), ObserverError> {
            self.seen.lock().push((item.to_string(), snapshot.value));
            Ok(())
        }
    }

    #[test]
    fn test_subscribe_unknown_item() {
        let registry = registry();
        let result = registry.subscribe("ghost", Arc::new(Recorder::default()));
        assert!(matches!(result, Err(NamespaceError::ItemNotFound { .. })));
        assert_eq!(registry.watched_items(), 0);
    }

    #[test]
    fn test_subscribe_unsubscribe_prunes() {
        let registry = registry();
        let token = registry
            .subscribe("DataItem_0000", Arc::new(Recorder::default()))
            .unwrap();

        assert_eq!(registry.observer_count("DataItem_0000"), 1);
        assert_eq!(registry.watched_items(), 1);

        assert!(registry.unsubscribe(&token));
        assert_eq!(registry.observer_count("DataItem_0000"), 0);
        assert_eq!(registry.watched_items(), 0);

        // Second unsubscribe is a no-op
        assert!(!registry.unsubscribe(&token));
    }

    #[test]
    fn test_subscribe_is_idempotent_per_observer() {
        let registry = registry();
        let observer: Arc<dyn Observer> = Arc::new(Recorder::default());

        let t1 = registry.subscribe("DataItem_0001", observer.clone()).unwrap();
        let t2 = registry.subscribe("DataItem_0001", observer.clone()).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(registry.observer_count("DataItem_0001"), 1);

        // Same observer on another item is a separate subscription
        let t3 = registry.subscribe("DataItem_0002", observer).unwrap();
        assert_ne!(t1, t3);
        assert_eq!(registry.total_subscriptions(), 2);
    }

    #[test]
    fn test_notify_delivers_to_item_observers_only() {
        let registry = registry();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        registry.subscribe("DataItem_0000", a.clone()).unwrap();
        registry.subscribe("DataItem_0001", b.clone()).unwrap();

        let report = registry.notify("DataItem_0000", &snapshot(7.0));

        assert_eq!(report.delivered, 1);
        assert!(report.is_clean());
        assert_eq!(*a.seen.lock(), vec![("DataItem_0000".to_string(), 7.0)]);
        assert!(b.seen.lock().is_empty());
    }

    #[test]
    fn test_notify_without_observers() {
        let registry = registry();
        let report = registry.notify("DataItem_0000", &snapshot(1.0));
        assert_eq!(report.attempted(), 0);
    }

    #[test]
    fn test_failing_observer_does_not_stop_fan_out() {
        let registry = registry();
        let failing: Arc<dyn Observer> =
            Arc::new(|_: &str, _: &ItemSnapshot| -> Result<(), ObserverError> {
                Err(ObserverError::failed("closed"))
            });
        let good = Arc::new(Recorder::default());

        let bad_token = registry.subscribe("DataItem_0000", failing).unwrap();
        registry.subscribe("DataItem_0000", good.clone()).unwrap();

        let report = registry.notify("DataItem_0000", &snapshot(2.0));

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, bad_token);
        assert_eq!(good.seen.lock().len(), 1);
    }

    #[test]
    fn test_panicking_observer_is_reported() {
        let registry = registry();
        let panicking: Arc<dyn Observer> =
            Arc::new(|_: &str, _: &ItemSnapshot| -> Result<(), ObserverError> {
                panic!("observer exploded")
            });
        let good = Arc::new(Recorder::default());

        let bad_token = registry.subscribe("DataItem_0002", panicking).unwrap();
        registry.subscribe("DataItem_0002", good.clone()).unwrap();

        let report = registry.notify("DataItem_0002", &snapshot(3.0));

        assert_eq!(report.delivered, 1);
        assert_eq!(
            report.failed,
            vec![(
                bad_token,
                ObserverError::Panicked("observer exploded".to_string())
            )]
        );
        assert_eq!(good.seen.lock().len(), 1);
    }

    #[test]
    fn test_unsubscribed_observer_gets_nothing() {
        let registry = registry();
        let observer = Arc::new(Recorder::default());
        let token = registry.subscribe("DataItem_0000", observer.clone()).unwrap();

        registry.notify("DataItem_0000", &snapshot(1.0));
        registry.unsubscribe(&token);
        registry.notify("DataItem_0000", &snapshot(2.0));

        assert_eq!(*observer.seen.lock(), vec![("DataItem_0000".to_string(), 1.0)]);
    }

    #[test]
    fn test_observer_may_unsubscribe_during_fan_out() {
        let registry = Arc::new(registry());
        let slot: Arc<Mutex<Option<SubscriptionToken>>> = Arc::new(Mutex::new(None));

        let r = Arc::clone(&registry);
        let s = Arc::clone(&slot);
        let observer: Arc<dyn Observer> = Arc::new(move |_: &str, _: &ItemSnapshot| -> Result<(), ObserverError> {
            if let Some(token) = s.lock().take() {
                r.unsubscribe(&token);
            }
            Ok(())
        });

        let token = registry.subscribe("DataItem_0001", observer).unwrap();
        *slot.lock() = Some(token);

        let report = registry.notify("DataItem_0001", &snapshot(1.0));
        assert_eq!(report.delivered, 1);
        assert_eq!(registry.watched_items(), 0);
    }
}
