//! Metrics hooks for namespace operations
//!
//! Counters for updates, fan-out and attribute traffic. The runtime logs a
//! [`MetricsSnapshot`] periodically; other deployments can plug their own
//! [`MetricsRecorder`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for namespace operations
#[derive(Default)]
pub struct NamespaceMetrics {
    /// Producer writes that were real transitions
    pub updates_applied: AtomicU64,
    /// Producer writes suppressed by coalescing
    pub updates_coalesced: AtomicU64,
    /// Observer callbacks that succeeded
    pub notifications_delivered: AtomicU64,
    /// Observer callbacks that failed or panicked
    pub observer_failures: AtomicU64,
    /// Attribute reads served
    pub attribute_reads: AtomicU64,
    /// Attribute reads answered with NotFound or NotApplicable
    pub reads_rejected: AtomicU64,
    /// Writes refused by the write policy
    pub writes_rejected: AtomicU64,
}

impl NamespaceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            updates_applied: self.updates_applied.load(Ordering::Relaxed),
            updates_coalesced: self.updates_coalesced.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
            observer_failures: self.observer_failures.load(Ordering::Relaxed),
            attribute_reads: self.attribute_reads.load(Ordering::Relaxed),
            reads_rejected: self.reads_rejected.load(Ordering::Relaxed),
            writes_rejected: self.writes_rejected.load(Ordering::Relaxed),
        }
    }

    /// Fraction of producer writes that were coalesced away
    pub fn coalesce_ratio(&self) -> f64 {
        let applied = self.updates_applied.load(Ordering::Relaxed);
        let coalesced = self.updates_coalesced.load(Ordering::Relaxed);
        let total = applied + coalesced;
        if total > 0 {
            coalesced as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub updates_applied: u64,
    pub updates_coalesced: u64,
    pub notifications_delivered: u64,
    pub observer_failures: u64,
    pub attribute_reads: u64,
    pub reads_rejected: u64,
    pub writes_rejected: u64,
}

/// Trait for custom metrics recording implementations
pub trait MetricsRecorder: Send + Sync {
    /// Record the outcome of a producer write
    fn record_update(&self, changed: bool);

    /// Record one fan-out
    fn record_fan_out(&self, delivered: usize, failed: usize);

    /// Record an attribute read
    fn record_read(&self, ok: bool);

    /// Record a refused write
    fn record_write_rejected(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_update(&self, _: bool) {}
    fn record_fan_out(&self, _: usize, _: usize) {}
    fn record_read(&self, _: bool) {}
    fn record_write_rejected(&self) {}
}

impl MetricsRecorder for NamespaceMetrics {
    fn record_update(&self, changed: bool) {
        if changed {
            self.updates_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.updates_coalesced.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_fan_out(&self, delivered: usize, failed: usize) {
        self.notifications_delivered
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.observer_failures
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    fn record_read(&self, ok: bool) {
        self.attribute_reads.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.reads_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_write_rejected(&self) {
        self.writes_rejected.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = NamespaceMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_updates() {
        let metrics = NamespaceMetrics::new();

        metrics.record_update(true);
        metrics.record_update(false);
        metrics.record_update(false);
        metrics.record_update(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.updates_applied, 2);
        assert_eq!(snapshot.updates_coalesced, 2);
        assert!((metrics.coalesce_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_fan_out_and_reads() {
        let metrics = NamespaceMetrics::new();

        metrics.record_fan_out(3, 1);
        metrics.record_read(true);
        metrics.record_read(false);
        metrics.record_write_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.notifications_delivered, 3);
        assert_eq!(snapshot.observer_failures, 1);
        assert_eq!(snapshot.attribute_reads, 2);
        assert_eq!(snapshot.reads_rejected, 1);
        assert_eq!(snapshot.writes_rejected, 1);
    }

    #[test]
    fn test_fresh_metrics_are_zero() {
        let metrics = NamespaceMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert_eq!(metrics.coalesce_ratio(), 0.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = NamespaceMetrics::new();
        metrics.record_update(true);
        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["updates_applied"], 1);
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_update(true);
        metrics.record_fan_out(1, 1);
        metrics.record_read(false);
        metrics.record_write_rejected();
    }
}
