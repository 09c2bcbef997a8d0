// ── Upstream feed seam ──
//
// The engine never talks to the sensing backend directly; it consumes raw
// device batches and raw alert records through this trait. Transport,
// auth, and retry policy belong to the implementor.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::UpstreamAlert;

/// Failures crossing the feed seam. Consumers see these wrapped in
/// [`CoreError::Feed`](crate::CoreError::Feed); the engine's own poll
/// paths convert them into `error`-severity alerts instead.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed unreachable: {0}")]
    Unreachable(String),

    #[error("malformed feed response: {0}")]
    Malformed(String),
}

/// Data source for device sightings and upstream alerts.
#[async_trait]
pub trait UpstreamFeed: Send + Sync {
    /// Fetch the current device batch as raw JSON (expected: an array of
    /// device records; anything else is ignored by ingestion).
    async fn fetch_devices(&self) -> Result<Value, FeedError>;

    /// Fetch the backend's own alert feed.
    async fn fetch_alerts(&self) -> Result<Vec<UpstreamAlert>, FeedError>;
}

/// In-memory feed serving canned batches. Stands in for the real backend
/// in demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFeed {
    devices: Value,
    alerts: Vec<UpstreamAlert>,
}

impl StaticFeed {
    pub fn new(devices: Value, alerts: Vec<UpstreamAlert>) -> Self {
        Self { devices, alerts }
    }

    pub fn with_devices(devices: Value) -> Self {
        Self {
            devices,
            alerts: Vec::new(),
        }
    }
}

#[async_trait]
impl UpstreamFeed for StaticFeed {
    async fn fetch_devices(&self) -> Result<Value, FeedError> {
        Ok(self.devices.clone())
    }

    async fn fetch_alerts(&self) -> Result<Vec<UpstreamAlert>, FeedError> {
        Ok(self.alerts.clone())
    }
}
