// ── Device record — raw feed input ──
//
// Owned by the upstream sensing backend; the engine never mutates one.
// Unrecognized fields are preserved in `extra` so the save automation's
// traffic catch-all sees everything the feed sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::mac::MacAddress;

/// Signal readings in dBm (higher value = stronger signal).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalInfo {
    /// Last observed signal. Defaults to -100 dBm when the feed omits it,
    /// which keeps absent readings below every alerting threshold.
    #[serde(default = "default_last_signal")]
    pub last_signal: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_signal: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_signal: Option<i32>,
}

fn default_last_signal() -> i32 {
    -100
}

impl Default for SignalInfo {
    fn default() -> Self {
        Self {
            last_signal: default_last_signal(),
            max_signal: None,
            min_signal: None,
        }
    }
}

/// One device sighting as delivered by the feed.
///
/// Every field is optional on the wire — a record that deserializes is
/// processed with whatever it carries, and a record that does not is
/// skipped by the ingestion pipeline without aborting the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Hardware address as the feed sent it (not yet normalized).
    #[serde(default)]
    pub mac: String,

    /// Display name / SSID. May be empty.
    #[serde(default)]
    pub name: String,

    /// Link-layer technology tag, e.g. "IEEE802.11", "BTLE", "UAV".
    #[serde(default)]
    pub phy: String,

    #[serde(default)]
    pub manuf: String,

    /// Upstream device classification, e.g. "Wi-Fi AP".
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub channel: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,

    #[serde(default)]
    pub signal: SignalInfo,

    // Traffic counters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets_total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets_data: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets_crypt: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasize: Option<u64>,

    // Sighting window (epoch seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_time: Option<i64>,

    /// Everything else the feed sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceRecord {
    /// Normalized identity for watchlist keys and save gating.
    pub fn mac(&self) -> MacAddress {
        MacAddress::new(&self.mac)
    }

    /// Human label: display name, falling back to the raw address.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.mac.is_empty() {
            &self.mac
        } else {
            "unknown"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_sparse_record() {
        let rec: DeviceRecord = serde_json::from_value(json!({
            "mac": "AA:BB:CC:11:22:33"
        }))
        .unwrap();
        assert_eq!(rec.mac, "AA:BB:CC:11:22:33");
        assert_eq!(rec.signal.last_signal, -100);
        assert!(rec.name.is_empty());
    }

    #[test]
    fn preserves_unknown_fields() {
        let rec: DeviceRecord = serde_json::from_value(json!({
            "mac": "AA:BB:CC:11:22:33",
            "dot11_packets_retry": 17,
            "crypt_set": "wpa2"
        }))
        .unwrap();
        assert_eq!(rec.extra.get("dot11_packets_retry"), Some(&json!(17)));
        assert_eq!(rec.extra.get("crypt_set"), Some(&json!("wpa2")));
    }

    #[test]
    fn label_falls_back_to_mac() {
        let rec: DeviceRecord = serde_json::from_value(json!({
            "mac": "AA:BB:CC:11:22:33",
            "name": ""
        }))
        .unwrap();
        assert_eq!(rec.label(), "AA:BB:CC:11:22:33");
        assert_eq!(DeviceRecord::default().label(), "unknown");
    }

    #[test]
    fn wrong_shape_is_an_error() {
        // `name` must be a string — a numeric value makes the whole record
        // malformed, which ingestion treats as a per-record skip.
        let res = serde_json::from_value::<DeviceRecord>(json!({
            "mac": "AA:BB:CC:11:22:33",
            "name": 42
        }));
        assert!(res.is_err());
    }
}
