//! The canonical per-item record and its change-coalescing rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusCode;

/// Point-in-time copy of an item's observable state.
///
/// This is what reads return and what observers receive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub value: f64,
    pub status: StatusCode,
    /// When value or status last changed. `None` until the first real change.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Mutable state of one item.
#[derive(Debug, Clone)]
pub struct ItemRecord {
    value: f64,
    status: StatusCode,
    timestamp: Option<DateTime<Utc>>,
}

impl Default for ItemRecord {
    fn default() -> Self {
        Self {
            value: 0.0,
            status: StatusCode::WaitingForInitialData,
            timestamp: None,
        }
    }
}

impl ItemRecord {
    /// Apply a write.
    ///
    /// Returns `true` only for a real transition (value or status differs),
    /// in which case the timestamp is set to `now`. Writing the current
    /// state again leaves the record untouched.
    pub fn apply(&mut self, value: f64, status: StatusCode, now: DateTime<Utc>) -> bool {
        if same_value(self.value, value) && self.status == status {
            return false;
        }
        self.value = value;
        self.status = status;
        self.timestamp = Some(now);
        true
    }

    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            value: self.value,
            status: self.status,
            timestamp: self.timestamp,
        }
    }
}

/// Numeric equality, except that NaN equals NaN so a stuck NaN source does
/// not produce a change on every write.
fn same_value(old: f64, new: f64) -> bool {
    old == new || (old.is_nan() && new.is_nan())
}
