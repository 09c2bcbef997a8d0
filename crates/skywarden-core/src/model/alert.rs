// ── Alert domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// What kind of sighting or engine condition an alert describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum AlertCategory {
    /// Drone/UAV sighting from the keyword or PHY detectors.
    DroneDetection,
    /// Device transmitting above the signal-strength threshold.
    StrongSignal,
    /// Alert mirrored from the upstream backend's own feed.
    UpstreamMirrored,
    /// A batch device export finished.
    SaveCompleted,
    /// An engine-internal failure (feed poll, export).
    Error,
}

/// Alert severity, ordered weakest to strongest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// One recorded alert. Immutable once appended to the log; evicted only by
/// the log's retention policy or an explicit clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Monotonically increasing, assigned by the alert log.
    pub id: u64,
    pub ts: DateTime<Utc>,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub title: String,
    pub body: String,

    /// The sighted device, when the alert came from a detector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_mac: Option<MacAddress>,
}

/// Optional, AND-combined query predicates for the alert log.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertFilter {
    pub severity: Option<AlertSeverity>,
    pub category: Option<AlertCategory>,
}

impl AlertFilter {
    pub fn matches(&self, event: &AlertEvent) -> bool {
        self.severity.is_none_or(|s| event.severity == s)
            && self.category.is_none_or(|c| event.category == c)
    }
}

/// Raw alert record from the upstream backend's own alert feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamAlert {
    /// Upstream severity ordinal; below 10 mirrors as a warning.
    #[serde(default = "default_upstream_severity")]
    pub severity: i64,

    #[serde(default)]
    pub header: String,

    #[serde(default)]
    pub text: String,
}

fn default_upstream_severity() -> i64 {
    5
}
