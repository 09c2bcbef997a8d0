// ── Engine facade ──
//
// Owns all engine state and runs the ingestion pipeline: raw device batch
// → detector set → alert log → watch policy → save automation. Cheaply
// cloneable; every clone shares the same state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::automation::rules::{AutomationConfig, AutomationUpdate};
use crate::automation::save::{self, SaveRecord};
use crate::automation::watch;
use crate::config::EngineConfig;
use crate::detect;
use crate::error::CoreError;
use crate::feed::UpstreamFeed;
use crate::model::{
    AlertCategory, AlertEvent, AlertFilter, AlertSeverity, DeviceRecord, MacAddress, WatchOrigin,
    WatchlistEntry,
};
use crate::store::{AlertLog, BoundedLog, Watchlist};

/// Alert log retention.
const MAX_ALERTS: usize = 500;
/// Alert-save outcome log retention.
const SAVE_LOG_CAP: usize = 100;
/// Batch-export outcome log retention.
const EXPORT_LOG_CAP: usize = 50;

/// Outcome of one batch device export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub ts: DateTime<Utc>,
    pub file: PathBuf,
    pub count: usize,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What one `ingest` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records in the batch.
    pub records: usize,
    /// Records skipped as malformed.
    pub skipped: usize,
    /// Alerts raised.
    pub alerts: usize,
}

// ── Engine ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<EngineInner>`. All state is in-memory and
/// resets on restart; the only durable output is the best-effort evidence
/// files written by the save automation.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: EngineConfig,
    alerts: AlertLog,
    watchlist: Watchlist,
    /// Hot-mutable automation settings; lock-free reads on the ingest path.
    automations: ArcSwap<AutomationConfig>,
    saves: BoundedLog<SaveRecord>,
    exports: BoundedLog<ExportRecord>,
    feed: Arc<dyn UpstreamFeed>,
    /// In-flight background work (alert saves, mirror polls).
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Engine {
    pub fn new(config: EngineConfig, feed: Arc<dyn UpstreamFeed>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                alerts: AlertLog::new(MAX_ALERTS),
                watchlist: Watchlist::new(),
                automations: ArcSwap::from_pointee(AutomationConfig::default()),
                saves: BoundedLog::new(SAVE_LOG_CAP),
                exports: BoundedLog::new(EXPORT_LOG_CAP),
                feed,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    // ── Ingestion pipeline ───────────────────────────────────────

    /// Run a raw device batch through the detector set.
    ///
    /// No-op unless the value is an array. Each produced event is appended
    /// to the alert log, evaluated against the watch rules, and handed to
    /// the save automation — in that order, per event. A malformed record
    /// is skipped; the batch continues.
    pub async fn ingest(&self, batch: &Value) -> IngestReport {
        let Some(records) = batch.as_array() else {
            debug!("ingest skipped: batch is not an array");
            return IngestReport::default();
        };

        let mut report = IngestReport {
            records: records.len(),
            ..IngestReport::default()
        };

        for raw in records {
            match serde_json::from_value::<DeviceRecord>(raw.clone()) {
                Ok(record) => {
                    for found in detect::evaluate(&record) {
                        self.raise(
                            found.category,
                            found.severity,
                            found.title,
                            found.body,
                            Some(&record),
                        );
                        report.alerts += 1;
                    }
                }
                Err(e) => {
                    report.skipped += 1;
                    debug!(error = %e, "skipping malformed device record");
                }
            }
        }

        debug!(
            records = report.records,
            skipped = report.skipped,
            alerts = report.alerts,
            "device batch ingested"
        );
        report
    }

    /// Fetch the current device batch from the feed, run it through the
    /// pipeline, and hand the raw batch back for the presentation layer.
    pub async fn poll_devices(&self) -> Result<Value, CoreError> {
        let batch = self.inner.feed.fetch_devices().await?;
        self.ingest(&batch).await;
        Ok(batch)
    }

    /// Record one event and run its side effects. The append is observable
    /// before the watch policy or save automation touch the event; neither
    /// can fail the recording.
    fn raise(
        &self,
        category: AlertCategory,
        severity: AlertSeverity,
        title: impl Into<String>,
        body: impl Into<String>,
        device: Option<&DeviceRecord>,
    ) -> Arc<AlertEvent> {
        let event = self.inner.alerts.append(
            category,
            severity,
            title,
            body,
            device.map(DeviceRecord::mac),
        );

        if let Some(record) = device {
            let automations = self.inner.automations.load();
            watch::evaluate(
                category,
                record,
                &automations.auto_watch_rules,
                &self.inner.watchlist,
            );
            self.spawn_save(Arc::clone(&event), record.clone());
        }

        event
    }

    /// Dispatch the save automation for one event, off the append path.
    /// Gates are evaluated on the spawned task against the automation
    /// settings current at save time.
    fn spawn_save(&self, event: Arc<AlertEvent>, record: DeviceRecord) {
        let inner = Arc::clone(&self.inner);
        self.track(tokio::spawn(async move {
            let automations = inner.automations.load_full();
            save::maybe_save(
                &inner.config.save_dir,
                &automations,
                &inner.watchlist,
                &inner.saves,
                &event,
                &record,
            )
            .await;
        }));
    }

    // ── Upstream alert mirroring ─────────────────────────────────

    /// Pull the backend's own alert feed and mirror the trailing records
    /// into the alert log. A fetch failure becomes one `error`-severity
    /// alert rather than propagating. Returns the number mirrored.
    pub async fn mirror_upstream_alerts(&self) -> usize {
        match self.inner.feed.fetch_alerts().await {
            Ok(raw) => {
                let start = raw.len().saturating_sub(self.inner.config.mirror_limit);
                let tail = &raw[start..];
                for alert in tail {
                    let severity = if alert.severity < 10 {
                        AlertSeverity::Warning
                    } else {
                        AlertSeverity::Info
                    };
                    let title = if alert.header.is_empty() {
                        "Upstream alert".to_owned()
                    } else {
                        alert.header.clone()
                    };
                    self.raise(
                        AlertCategory::UpstreamMirrored,
                        severity,
                        title,
                        alert.text.clone(),
                        None,
                    );
                }
                debug!(mirrored = tail.len(), "upstream alert poll complete");
                tail.len()
            }
            Err(e) => {
                warn!(error = %e, "upstream alert poll failed");
                self.raise(
                    AlertCategory::Error,
                    AlertSeverity::Error,
                    "Upstream alert poll failed",
                    e.to_string(),
                    None,
                );
                0
            }
        }
    }

    /// Fire-and-forget mirror poll, for the API layer's async trigger.
    pub fn spawn_mirror_poll(&self) {
        let engine = self.clone();
        self.track(tokio::spawn(async move {
            engine.mirror_upstream_alerts().await;
        }));
    }

    // ── Batch device export ──────────────────────────────────────

    /// Fetch every device from the feed, analyze the batch, and write it
    /// to a timestamped JSON file. Invoked by the external save scheduler
    /// or an operator. Failures are recorded and alerted, never raised.
    pub async fn export_devices(&self, label: &str) {
        let now = Utc::now();
        let slug = now.format(save::TIMESTAMP_SLUG).to_string();
        let file = self.inner.config.save_dir.join(format!(
            "devices_{}_{slug}.json",
            save::sanitize_component(label)
        ));

        match self.run_export(&file, &slug).await {
            Ok(count) => {
                info!(file = %file.display(), count, "batch export complete");
                self.inner.exports.push(ExportRecord {
                    ts: now,
                    file: file.clone(),
                    count,
                    ok: true,
                    error: None,
                });
                self.raise(
                    AlertCategory::SaveCompleted,
                    AlertSeverity::Info,
                    format!("💾 Batch export complete: {count} devices"),
                    file.display().to_string(),
                    None,
                );
            }
            Err(e) => {
                error!(error = %e, "batch export failed");
                self.inner.exports.push(ExportRecord {
                    ts: now,
                    file,
                    count: 0,
                    ok: false,
                    error: Some(e.to_string()),
                });
                self.raise(
                    AlertCategory::Error,
                    AlertSeverity::Error,
                    "Batch export failed",
                    e.to_string(),
                    None,
                );
            }
        }
    }

    async fn run_export(&self, file: &Path, slug: &str) -> Result<usize, CoreError> {
        let batch = self.inner.feed.fetch_devices().await?;
        self.ingest(&batch).await;

        let count = batch.as_array().map_or(0, Vec::len);
        tokio::fs::create_dir_all(&self.inner.config.save_dir).await?;
        let payload = serde_json::json!({ "ts": slug, "devices": batch });
        let body = serde_json::to_vec_pretty(&payload).map_err(std::io::Error::from)?;
        tokio::fs::write(file, body).await?;
        Ok(count)
    }

    // ── Alert queries ────────────────────────────────────────────

    /// Newest `limit` alerts matching the filter.
    pub fn alerts(&self, filter: &AlertFilter, limit: usize) -> Vec<Arc<AlertEvent>> {
        self.inner.alerts.query(filter, limit)
    }

    pub fn alert_count(&self) -> usize {
        self.inner.alerts.len()
    }

    pub fn clear_alerts(&self) {
        self.inner.alerts.clear();
        info!("alert log cleared");
    }

    // ── Automation settings ──────────────────────────────────────

    /// Current automation settings snapshot.
    pub fn automations(&self) -> Arc<AutomationConfig> {
        self.inner.automations.load_full()
    }

    /// Apply a partial update; absent fields are untouched. Returns the
    /// new snapshot.
    pub fn update_automations(&self, update: &AutomationUpdate) -> Arc<AutomationConfig> {
        let mut next = (*self.inner.automations.load_full()).clone();
        update.apply(&mut next);
        let next = Arc::new(next);
        self.inner.automations.store(Arc::clone(&next));
        info!("automation settings updated");
        next
    }

    // ── Watchlist ────────────────────────────────────────────────

    /// All watched devices, newest first.
    pub fn watchlist(&self) -> Vec<Arc<WatchlistEntry>> {
        self.inner.watchlist.snapshot()
    }

    /// Manually add (or refresh) a watched device. Rejects an empty
    /// identifier; returns the watchlist size on success.
    pub fn watch(&self, mac: &str, name: &str, phy: &str) -> Result<usize, CoreError> {
        let mac = MacAddress::new(mac);
        if mac.is_empty() {
            return Err(CoreError::Validation {
                message: "device identifier required".into(),
            });
        }

        let name = if name.is_empty() {
            mac.to_string()
        } else {
            name.to_owned()
        };
        self.inner.watchlist.upsert(WatchlistEntry {
            mac: mac.clone(),
            name,
            phy: phy.to_owned(),
            added_at: Utc::now(),
            origin: WatchOrigin::Manual,
        });
        info!(mac = %mac, "device watched");
        Ok(self.inner.watchlist.len())
    }

    /// Remove a watched device. Returns whether an entry existed.
    pub fn unwatch(&self, mac: &str) -> bool {
        let removed = self
            .inner
            .watchlist
            .remove(&MacAddress::new(mac))
            .is_some();
        if removed {
            info!(mac = %MacAddress::new(mac), "device unwatched");
        }
        removed
    }

    // ── Side-effect trails ───────────────────────────────────────

    /// Alert-save outcomes, newest first (cap 100).
    pub fn save_log(&self) -> Vec<SaveRecord> {
        self.inner.saves.snapshot()
    }

    /// Batch-export outcomes, newest first (cap 50).
    pub fn export_log(&self) -> Vec<ExportRecord> {
        self.inner.exports.snapshot()
    }

    // ── Background work ──────────────────────────────────────────

    fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Wait for in-flight background work (alert saves, mirror polls).
    /// Shutdown and test aid; new work can still be scheduled afterwards.
    pub async fn drain_tasks(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self
                .inner
                .tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            tasks.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                debug!(error = %e, "background task aborted");
            }
        }
    }
}
