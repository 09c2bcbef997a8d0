// ── Alert-save automation ──
//
// Best-effort persistence of alert evidence. Runs on a spawned task, off
// the append path. Every attempt — pass or fail — lands in the bounded
// save log; nothing here propagates an error to the ingestion caller.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use super::rules::AutomationConfig;
use crate::model::{AlertCategory, AlertEvent, DeviceRecord, SignalInfo};
use crate::store::{BoundedLog, Watchlist};

/// Filename timestamp slug, e.g. `20260808_142557`.
pub(crate) const TIMESTAMP_SLUG: &str = "%Y%m%d_%H%M%S";

/// Outcome of one attempted alert save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecord {
    pub ts: DateTime<Utc>,
    pub file: PathBuf,
    pub category: AlertCategory,
    /// Device label at save time.
    pub device: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Keep alphanumerics, hyphen, and underscore; everything else becomes an
/// underscore. Capped at 80 chars so device names can't blow up paths.
pub(crate) fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(80)
        .collect()
}

/// Gate, build, and write the evidence file for one alert/device pair,
/// then record the outcome. Gates short-circuit in order: master switch,
/// at least one payload block enabled, watchlist restriction.
pub(crate) async fn maybe_save(
    save_dir: &Path,
    automations: &AutomationConfig,
    watchlist: &Watchlist,
    log: &BoundedLog<SaveRecord>,
    event: &AlertEvent,
    device: &DeviceRecord,
) {
    if !automations.alert_save_enabled {
        return;
    }
    if !automations.save_device_details && !automations.save_device_traffic {
        return;
    }
    if automations.save_watched_only && !watchlist.contains(&device.mac()) {
        debug!(mac = %device.mac(), "alert save skipped: device not watchlisted");
        return;
    }

    let now = Utc::now();
    let slug = now.format(TIMESTAMP_SLUG).to_string();
    let filename = format!(
        "alert_{}_{}_{slug}.json",
        sanitize_component(&event.category.to_string()),
        sanitize_component(device.label()),
    );
    let path = save_dir.join(filename);

    let payload = SavePayload {
        saved_at: &slug,
        alert: event,
        device: automations
            .save_device_details
            .then(|| DeviceDetail::from_record(device)),
        traffic: automations
            .save_device_traffic
            .then(|| TrafficBlock::from_record(device)),
    };

    let record = match write_payload(&path, &payload).await {
        Ok(()) => {
            info!(file = %path.display(), "alert save");
            SaveRecord {
                ts: now,
                file: path,
                category: event.category,
                device: device.label().to_owned(),
                ok: true,
                error: None,
            }
        }
        Err(e) => {
            error!(error = %e, file = %path.display(), "alert save failed");
            SaveRecord {
                ts: now,
                file: path,
                category: event.category,
                device: device.label().to_owned(),
                ok: false,
                error: Some(e.to_string()),
            }
        }
    };
    log.push(record);
}

async fn write_payload(path: &Path, payload: &SavePayload<'_>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_vec_pretty(payload)?;
    tokio::fs::write(path, body).await
}

// ── Payload shape ───────────────────────────────────────────────────

#[derive(Serialize)]
struct SavePayload<'a> {
    saved_at: &'a str,
    alert: &'a AlertEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<DeviceDetail<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traffic: Option<TrafficBlock>,
}

/// Identity block — included when `save_device_details` is on.
#[derive(Serialize)]
struct DeviceDetail<'a> {
    mac: &'a str,
    name: &'a str,
    phy: &'a str,
    manuf: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    channel: &'a str,
    frequency: Option<u64>,
    signal: SignalInfo,
    first_time: Option<i64>,
    last_time: Option<i64>,
    packets_total: Option<u64>,
}

impl<'a> DeviceDetail<'a> {
    fn from_record(record: &'a DeviceRecord) -> Self {
        Self {
            mac: &record.mac,
            name: &record.name,
            phy: &record.phy,
            manuf: &record.manuf,
            kind: &record.kind,
            channel: &record.channel,
            frequency: record.frequency,
            signal: record.signal,
            first_time: record.first_time,
            last_time: record.last_time,
            packets_total: record.packets_total,
        }
    }
}

/// Traffic block — included when `save_device_traffic` is on. `raw` is a
/// catch-all over the serialized record: every field whose key contains
/// "packet", "data", or "crypt" (case-insensitive), flattened extras
/// included.
#[derive(Serialize)]
struct TrafficBlock {
    packets_total: Option<u64>,
    packets_data: Option<u64>,
    packets_crypt: Option<u64>,
    datasize: Option<u64>,
    raw: Map<String, Value>,
}

impl TrafficBlock {
    fn from_record(record: &DeviceRecord) -> Self {
        let mut raw = Map::new();
        if let Ok(Value::Object(fields)) = serde_json::to_value(record) {
            for (key, value) in fields {
                let lower = key.to_lowercase();
                if lower.contains("packet") || lower.contains("data") || lower.contains("crypt") {
                    raw.insert(key, value);
                }
            }
        }
        Self {
            packets_total: record.packets_total,
            packets_data: record.packets_data,
            packets_crypt: record.packets_crypt,
            datasize: record.datasize,
            raw,
        }
    }
}
