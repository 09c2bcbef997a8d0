// ── Watchlist entry ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// How an entry got onto the watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchOrigin {
    /// Added directly by an operator.
    Manual,
    /// Added by the auto-watch policy when a rule fired.
    Automatic,
}

/// A tracked device. Removed only by explicit deletion — entries never
/// expire on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub mac: MacAddress,
    /// Display name, falling back to the identifier when the device is
    /// nameless.
    pub name: String,
    pub phy: String,
    pub added_at: DateTime<Utc>,
    pub origin: WatchOrigin,
}

impl WatchlistEntry {
    pub fn is_automatic(&self) -> bool {
        self.origin == WatchOrigin::Automatic
    }
}
