//! Alert and automation engine for a wireless-sensing backend.
//!
//! This crate owns the monitoring pipeline that sits between a raw
//! device/alert feed and its consumers (dashboard, API layer):
//!
//! - **[`Engine`]** — Central facade managing all engine state: the bounded
//!   alert log, the device watchlist, hot-mutable automation settings, and
//!   the alert-save machinery. [`Engine::ingest`] runs a raw device batch
//!   through the detector set; every produced event is recorded, evaluated
//!   against the watch rules, and handed to the save automation.
//!
//! - **Detector set** ([`detect`]) — pure, side-effect-free classification
//!   of a single device record into candidate alerts: drone keyword match,
//!   UAV PHY sighting, and strong-signal threshold.
//!
//! - **[`AlertLog`]** — bounded, thread-safe, newest-first event log with
//!   filtered queries. Ids are monotonic and assigned under the append lock.
//!
//! - **[`Watchlist`]** — MAC-keyed set of tracked devices, populated
//!   manually by operators or automatically by the watch policy.
//!
//! - **[`UpstreamFeed`]** — seam to the sensing backend. The engine only
//!   ever sees raw device batches and raw alert records through this trait;
//!   transport concerns live with the implementor.
//!
//! All state is in-memory and resets on restart. The only durable output is
//! best-effort: JSON evidence files written by the save automation.

pub mod automation;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod feed;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use automation::{
    AutoWatchRules, AutoWatchRulesUpdate, AutomationConfig, AutomationUpdate, SaveRecord,
};
pub use config::EngineConfig;
pub use engine::{Engine, ExportRecord, IngestReport};
pub use error::CoreError;
pub use feed::{FeedError, StaticFeed, UpstreamFeed};
pub use store::{AlertLog, Watchlist};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AlertCategory, AlertEvent, AlertFilter, AlertSeverity, DeviceRecord, MacAddress, SignalInfo,
    UpstreamAlert, WatchOrigin, WatchlistEntry,
};
