// ── Domain model ──
//
// Canonical types for everything the engine ingests, records, or tracks.
// Raw feed JSON is deserialized into these; consumers (API/dashboard)
// depend on them directly.

pub mod alert;
pub mod device;
pub mod mac;
pub mod watchlist;

// ── Re-exports ──────────────────────────────────────────────────────

pub use alert::{AlertCategory, AlertEvent, AlertFilter, AlertSeverity, UpstreamAlert};
pub use device::{DeviceRecord, SignalInfo};
pub use mac::MacAddress;
pub use watchlist::{WatchOrigin, WatchlistEntry};
