// ── Auto-watch policy ──
//
// Runs after an alert is recorded; decides whether the sighted device
// joins the watchlist. Must never block or fail alert recording — the
// only mutation is a per-key atomic insert.

use chrono::Utc;
use tracing::info;

use super::rules::AutoWatchRules;
use crate::model::{AlertCategory, DeviceRecord, WatchOrigin, WatchlistEntry};
use crate::store::Watchlist;

/// Link-layer tags the btle rule applies to.
const BTLE_PHYS: &[&str] = &["BTLE", "Bluetooth"];

/// Evaluate the auto-watch rules for one alert/device pair, inserting an
/// automatic watchlist entry when any applicable rule is enabled.
/// Returns `true` if this call added the device.
pub(crate) fn evaluate(
    category: AlertCategory,
    device: &DeviceRecord,
    rules: &AutoWatchRules,
    watchlist: &Watchlist,
) -> bool {
    let mac = device.mac();
    if mac.is_empty() || watchlist.contains(&mac) {
        return false;
    }
    if !should_watch(category, &device.phy, rules) {
        return false;
    }

    let name = if device.name.is_empty() {
        mac.to_string()
    } else {
        device.name.clone()
    };

    let added = watchlist.insert_if_absent(mac.clone(), || WatchlistEntry {
        mac: mac.clone(),
        name: name.clone(),
        phy: device.phy.clone(),
        added_at: Utc::now(),
        origin: WatchOrigin::Automatic,
    });

    if added {
        info!(device = %name, mac = %mac, category = %category, "auto-watched device");
    }
    added
}

/// Rule mapping. Checks are independent and OR-combined.
fn should_watch(category: AlertCategory, phy: &str, rules: &AutoWatchRules) -> bool {
    let mut watch = false;
    if rules.drone_alerts && category == AlertCategory::DroneDetection {
        watch = true;
    }
    if rules.btle_alerts
        && matches!(
            category,
            AlertCategory::StrongSignal | AlertCategory::UpstreamMirrored
        )
        && BTLE_PHYS.contains(&phy)
    {
        watch = true;
    }
    if rules.strong_signal && category == AlertCategory::StrongSignal {
        watch = true;
    }
    watch
}
