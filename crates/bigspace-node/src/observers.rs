//! Observers hosted by the node process.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use bigspace_namespace::{ItemSnapshot, Observer, ObserverError};

/// Stands in for a client session: logs every change it receives.
pub struct LoggingObserver {
    session: String,
    received: AtomicU64,
}

impl LoggingObserver {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            received: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// Notifications received so far.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }
}

impl Observer for LoggingObserver {
    fn on_change(&self, item: &str, snapshot: &ItemSnapshot) -> Result<(), ObserverError> {
        self.received.fetch_add(1, Ordering::Relaxed);
        debug!(
            session = %self.session,
            item,
            value = snapshot.value,
            status = %snapshot.status,
            "Value changed"
        );
        Ok(())
    }
}
