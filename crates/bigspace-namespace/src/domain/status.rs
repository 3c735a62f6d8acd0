//! Item quality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality of an item's value.
///
/// Items start out as `WaitingForInitialData`, which is a bad quality: no
/// producer has written them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusCode {
    Good,
    Bad,
    #[default]
    WaitingForInitialData,
}

impl StatusCode {
    pub fn is_good(&self) -> bool {
        matches!(self, StatusCode::Good)
    }

    pub fn is_bad(&self) -> bool {
        !self.is_good()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCode::Good => "Good",
            StatusCode::Bad => "Bad",
            StatusCode::WaitingForInitialData => "Bad_WaitingForInitialData",
        };
        f.write_str(s)
    }
}
