// ── Detector set ──
//
// Pure classification of a single device record into candidate alerts.
// Detectors are independent and side-effect-free; evaluation order is part
// of the contract because downstream consumers see events in this order.

use crate::model::{AlertCategory, AlertSeverity, DeviceRecord};

/// Vendor/model terms that mark a device as a probable drone. Matched as
/// lowercase substrings of the combined name + manufacturer string.
pub const DRONE_KEYWORDS: &[&str] = &[
    "dji",
    "parrot",
    "yuneec",
    "autel",
    "skydio",
    "bebop",
    "phantom",
    "mavic",
    "inspire",
    "matrice",
    "tello",
    "fpv",
    "drone",
    "uav",
    "ardupilot",
    "pixhawk",
    "droneid",
];

/// Link-layer tag the upstream backend assigns to remote-ID drone frames.
pub const UAV_PHY: &str = "UAV";

/// dBm threshold above which a sighting is "unusually strong". Higher dBm
/// means stronger, so the comparison is strictly greater-than.
pub const STRONG_SIGNAL_DBM: i32 = -60;

/// A candidate alert produced by one detector for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub title: String,
    pub body: String,
}

/// Run every detector against one record, in rule order:
/// keyword match, then UAV PHY, then signal strength.
///
/// A device can trigger more than one rule — there is no dedup here.
pub fn evaluate(record: &DeviceRecord) -> Vec<Detection> {
    let mut detections = Vec::new();
    let label = record.label();
    let signal = record.signal.last_signal;

    // Drone keyword in name or manufacturer — first match wins.
    let combined = format!("{} {}", record.name, record.manuf).to_lowercase();
    if let Some(kw) = DRONE_KEYWORDS.iter().find(|kw| combined.contains(*kw)) {
        detections.push(Detection {
            category: AlertCategory::DroneDetection,
            severity: AlertSeverity::Critical,
            title: format!("🚁 Drone detected: {label}"),
            body: format!(
                "MAC: {} | PHY: {} | Manuf: {} | Signal: {signal} dBm | Keyword matched: '{kw}'",
                record.mac, record.phy, record.manuf
            ),
        });
    }

    // UAV PHY sighting — independent of the keyword rule.
    if record.phy == UAV_PHY {
        detections.push(Detection {
            category: AlertCategory::DroneDetection,
            severity: AlertSeverity::Critical,
            title: format!("🚁 UAV PHY device: {label}"),
            body: format!(
                "MAC: {} | Manuf: {} | Signal: {signal} dBm",
                record.mac, record.manuf
            ),
        });
    }

    // Unusually strong signal.
    if signal > STRONG_SIGNAL_DBM {
        detections.push(Detection {
            category: AlertCategory::StrongSignal,
            severity: AlertSeverity::Warning,
            title: format!("📶 Strong signal: {label}"),
            body: format!("MAC: {} | Signal: {signal} dBm | PHY: {}", record.mac, record.phy),
        });
    }

    detections
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: serde_json::Value) -> DeviceRecord {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn keyword_in_name_fires_drone_detection() {
        let rec = record(json!({
            "mac": "60:60:1F:AA:BB:CC",
            "name": "DJI-Mavic-3-Pro",
            "manuf": "Shenzhen",
            "signal": {"last_signal": -70}
        }));
        let found = evaluate(&rec);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, AlertCategory::DroneDetection);
        assert_eq!(found[0].severity, AlertSeverity::Critical);
        assert!(found[0].body.contains("'dji'"), "body names the keyword");
    }

    #[test]
    fn keyword_in_manufacturer_alone_matches() {
        let rec = record(json!({
            "mac": "11:22:33:44:55:66",
            "name": "",
            "manuf": "Parrot SA",
            "signal": {"last_signal": -80}
        }));
        let found = evaluate(&rec);
        assert_eq!(found.len(), 1);
        assert!(found[0].body.contains("'parrot'"));
    }

    #[test]
    fn first_matching_keyword_wins() {
        // "dji" precedes "mavic" in the list; only one event, naming "dji".
        let rec = record(json!({
            "mac": "11:22:33:44:55:66",
            "name": "DJI Mavic",
            "signal": {"last_signal": -80}
        }));
        let found = evaluate(&rec);
        assert_eq!(found.len(), 1);
        assert!(found[0].body.contains("'dji'"));
    }

    #[test]
    fn uav_phy_fires_without_keyword() {
        let rec = record(json!({
            "mac": "A0:B1:C2:D3:E4:F5",
            "name": "RemoteID-0x4F2A",
            "phy": "UAV",
            "signal": {"last_signal": -80}
        }));
        let found = evaluate(&rec);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, AlertCategory::DroneDetection);
        assert!(found[0].title.contains("UAV PHY"));
    }

    #[test]
    fn keyword_and_phy_both_fire() {
        let rec = record(json!({
            "mac": "A0:B1:C2:D3:E4:F5",
            "name": "UAV-RemoteID-0x4F2A",
            "phy": "UAV",
            "manuf": "DJI Technology",
            "signal": {"last_signal": -80}
        }));
        let found = evaluate(&rec);
        assert_eq!(found.len(), 2);
        assert!(
            found
                .iter()
                .all(|d| d.category == AlertCategory::DroneDetection)
        );
    }

    #[test]
    fn strong_signal_is_strictly_greater() {
        let hot = record(json!({
            "mac": "AA:AA:AA:AA:AA:AA",
            "signal": {"last_signal": -59}
        }));
        assert_eq!(evaluate(&hot).len(), 1);
        assert_eq!(evaluate(&hot)[0].category, AlertCategory::StrongSignal);

        let boundary = record(json!({
            "mac": "AA:AA:AA:AA:AA:AA",
            "signal": {"last_signal": -60}
        }));
        assert!(evaluate(&boundary).is_empty());
    }

    #[test]
    fn missing_signal_block_never_alerts_on_strength() {
        let rec = record(json!({"mac": "AA:AA:AA:AA:AA:AA", "name": "Quiet"}));
        assert!(evaluate(&rec).is_empty());
    }

    #[test]
    fn drone_with_strong_signal_yields_both() {
        let rec = record(json!({
            "mac": "60:60:1F:AA:BB:CC",
            "name": "DJI-Mavic-3-Pro",
            "manuf": "DJI Technology",
            "phy": "IEEE802.11",
            "signal": {"last_signal": -38}
        }));
        let found = evaluate(&rec);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].category, AlertCategory::DroneDetection);
        assert_eq!(found[1].category, AlertCategory::StrongSignal);
    }
}
