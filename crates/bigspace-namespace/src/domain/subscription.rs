//! Subscription tokens and fan-out reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ObserverError;

/// Handle returned by a successful subscribe.
///
/// Carries the item it was issued for so unsubscribing needs nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionToken {
    pub id: u64,
    pub item: String,
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}@{}", self.id, self.item)
    }
}

/// Outcome of delivering one change to every observer of an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanOutReport {
    /// Observers that accepted the notification.
    pub delivered: usize,
    /// Observers whose callback failed, with the failure.
    pub failed: Vec<(SubscriptionToken, ObserverError)>,
}

impl FanOutReport {
    /// Total observers the notification was attempted on.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_tokens(&self) -> impl Iterator<Item = &SubscriptionToken> {
        self.failed.iter().map(|(token, _)| token)
    }
}

/// Result of applying one producer update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Whether the write was a real transition.
    pub changed: bool,
    /// Fan-out result; `None` when the write was coalesced.
    pub report: Option<FanOutReport>,
}

impl UpdateOutcome {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed(report: FanOutReport) -> Self {
        Self {
            changed: true,
            report: Some(report),
        }
    }
}
