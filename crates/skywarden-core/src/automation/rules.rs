// ── Automation configuration ──
//
// Hot-mutable process state. The engine keeps it behind an ArcSwap so the
// ingest path reads it without locking; writes replace the whole snapshot.

use serde::{Deserialize, Serialize};

/// Which alert conditions auto-add the sighted device to the watchlist.
/// Rules are independent; any enabled, applicable rule causes the add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoWatchRules {
    /// Watch devices that raised a drone-detection alert.
    pub drone_alerts: bool,
    /// Watch Bluetooth/BTLE devices that raised signal or mirrored alerts.
    pub btle_alerts: bool,
    /// Watch any device that raised a strong-signal alert.
    pub strong_signal: bool,
}

impl Default for AutoWatchRules {
    fn default() -> Self {
        Self {
            drone_alerts: true,
            btle_alerts: true,
            strong_signal: false,
        }
    }
}

/// Master automation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AutomationConfig {
    /// Master switch for save-on-alert. Off suppresses every save.
    pub alert_save_enabled: bool,
    /// Include the device identity block in saved payloads.
    pub save_device_details: bool,
    /// Include the traffic block in saved payloads.
    pub save_device_traffic: bool,
    /// Only save alerts for devices already on the watchlist.
    pub save_watched_only: bool,
    pub auto_watch_rules: AutoWatchRules,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            alert_save_enabled: true,
            save_device_details: true,
            save_device_traffic: true,
            save_watched_only: false,
            auto_watch_rules: AutoWatchRules::default(),
        }
    }
}

/// Partial update for [`AutomationConfig`]. Absent fields are untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AutomationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_save_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_device_details: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_device_traffic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_watched_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_watch_rules: Option<AutoWatchRulesUpdate>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AutoWatchRulesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone_alerts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btle_alerts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong_signal: Option<bool>,
}

impl AutomationUpdate {
    pub fn apply(&self, config: &mut AutomationConfig) {
        if let Some(v) = self.alert_save_enabled {
            config.alert_save_enabled = v;
        }
        if let Some(v) = self.save_device_details {
            config.save_device_details = v;
        }
        if let Some(v) = self.save_device_traffic {
            config.save_device_traffic = v;
        }
        if let Some(v) = self.save_watched_only {
            config.save_watched_only = v;
        }
        if let Some(rules) = self.auto_watch_rules {
            if let Some(v) = rules.drone_alerts {
                config.auto_watch_rules.drone_alerts = v;
            }
            if let Some(v) = rules.btle_alerts {
                config.auto_watch_rules.btle_alerts = v;
            }
            if let Some(v) = rules.strong_signal {
                config.auto_watch_rules.strong_signal = v;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipping_policy() {
        let config = AutomationConfig::default();
        assert!(config.alert_save_enabled);
        assert!(config.save_device_details);
        assert!(config.save_device_traffic);
        assert!(!config.save_watched_only);
        assert!(config.auto_watch_rules.drone_alerts);
        assert!(config.auto_watch_rules.btle_alerts);
        assert!(!config.auto_watch_rules.strong_signal);
    }

    #[test]
    fn partial_update_touches_only_supplied_fields() {
        let mut config = AutomationConfig::default();
        AutomationUpdate {
            save_watched_only: Some(true),
            auto_watch_rules: Some(AutoWatchRulesUpdate {
                strong_signal: Some(true),
                ..AutoWatchRulesUpdate::default()
            }),
            ..AutomationUpdate::default()
        }
        .apply(&mut config);

        assert!(config.save_watched_only);
        assert!(config.auto_watch_rules.strong_signal);
        // Untouched fields keep their defaults.
        assert!(config.alert_save_enabled);
        assert!(config.auto_watch_rules.drone_alerts);
    }

    #[test]
    fn update_deserializes_from_sparse_json() {
        let update: AutomationUpdate =
            serde_json::from_value(serde_json::json!({"alert_save_enabled": false})).unwrap();
        assert_eq!(update.alert_save_enabled, Some(false));
        assert!(update.auto_watch_rules.is_none());
    }
}
