//! Outbound (Driven) Ports
//!
//! Dependencies the namespace calls out to: observers receiving changes, the
//! clock stamping transitions, and the signal feeding the tick driver.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::ItemSnapshot;
use crate::error::ObserverError;

/// Receiver of item change notifications.
///
/// Called on a writer's thread after the change is applied, with no namespace
/// lock held. Implementations should return quickly. Writes made from inside
/// the callback are queued and delivered after the current notification.
pub trait Observer: Send + Sync {
    fn on_change(&self, item: &str, snapshot: &ItemSnapshot) -> Result<(), ObserverError>;
}

impl<F> Observer for F
where
    F: Fn(&str, &ItemSnapshot) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_change(&self, item: &str, snapshot: &ItemSnapshot) -> Result<(), ObserverError> {
        self(item, snapshot)
    }
}

/// Time source for transition timestamps.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualTimeSource {
    time: Mutex<DateTime<Utc>>,
}

impl ManualTimeSource {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            time: Mutex::new(initial),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut time = self.time.lock();
        *time += by;
    }

    pub fn set(&self, time: DateTime<Utc>) {
        *self.time.lock() = time;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock()
    }
}

/// Producer of the values the tick driver writes.
pub trait SignalSource: Send {
    /// Next sample; called once per tick.
    fn next_sample(&mut self) -> f64;
}
